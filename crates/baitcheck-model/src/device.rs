use candle_core::Device;

pub fn select_device() -> Device {
    #[cfg(feature = "metal")]
    {
        if let Ok(dev) = Device::new_metal(0) {
            eprintln!("🚀 Device: Metal (MPS)");
            return dev;
        }
    }
    #[cfg(feature = "cuda")]
    {
        if let Ok(dev) = Device::new_cuda(0) {
            eprintln!("🚀 Device: CUDA");
            return dev;
        }
    }
    eprintln!("🖥️  Device: CPU");
    Device::Cpu
}
