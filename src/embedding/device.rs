use candle_core::Device;
use tracing::{info, warn};

/// Picks the first usable accelerator compiled in (Metal, then CUDA), else CPU.
pub fn select_device() -> Device {
    #[allow(unused_mut)]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            info!("Using Metal GPU acceleration");
            return device;
        }
        Err(e) => failures.push(format!("metal: {e}")),
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            info!("Using CUDA GPU acceleration");
            return device;
        }
        Err(e) => failures.push(format!("cuda: {e}")),
    }

    if failures.is_empty() {
        info!("Using CPU device");
    } else {
        warn!(reason = %failures.join("; "), "GPU unavailable, falling back to CPU");
    }
    Device::Cpu
}
