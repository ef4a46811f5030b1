use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Where inference runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    /// NVIDIA GPU.
    Cuda,
    /// Apple unified-memory accelerator.
    Mps,
    /// Discrete accelerator (Intel XPU).
    Xpu,
    Cpu,
}

impl Device {
    /// Auto-selection order, first available wins.
    pub const PRIORITY: [Device; 4] = [Device::Cuda, Device::Mps, Device::Xpu, Device::Cpu];

    pub fn as_str(self) -> &'static str {
        match self {
            Device::Cuda => "cuda",
            Device::Mps => "mps",
            Device::Xpu => "xpu",
            Device::Cpu => "cpu",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Device {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Device::PRIORITY
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownDevice(s.to_string()))
    }
}

/// Reports whether a device can be used on this machine.
pub trait DeviceProbe {
    fn is_available(&self, device: Device) -> bool;
}

/// Returns the requested device, or the first available one in
/// [`Device::PRIORITY`] order. The CPU is always considered available.
pub fn select_device(requested: Option<Device>, probe: &impl DeviceProbe) -> Device {
    if let Some(device) = requested {
        return device;
    }
    Device::PRIORITY
        .into_iter()
        .find(|&d| d == Device::Cpu || probe.is_available(d))
        .unwrap_or(Device::Cpu)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Only(&'static [Device]);

    impl DeviceProbe for Only {
        fn is_available(&self, device: Device) -> bool {
            self.0.contains(&device)
        }
    }

    #[test]
    fn picks_first_available_in_priority_order() {
        let all = Only(&[Device::Cuda, Device::Mps, Device::Xpu]);
        assert_eq!(select_device(None, &all), Device::Cuda);

        let no_cuda = Only(&[Device::Mps, Device::Xpu]);
        assert_eq!(select_device(None, &no_cuda), Device::Mps);

        let xpu_only = Only(&[Device::Xpu]);
        assert_eq!(select_device(None, &xpu_only), Device::Xpu);

        let nothing = Only(&[]);
        assert_eq!(select_device(None, &nothing), Device::Cpu);
    }

    #[test]
    fn explicit_device_wins() {
        let all = Only(&[Device::Cuda, Device::Mps, Device::Xpu]);
        assert_eq!(select_device(Some(Device::Cpu), &all), Device::Cpu);
        assert_eq!(select_device(Some(Device::Xpu), &Only(&[])), Device::Xpu);
    }

    #[test]
    fn parses_device_names() {
        assert_eq!("cuda".parse::<Device>().unwrap(), Device::Cuda);
        assert_eq!("MPS".parse::<Device>().unwrap(), Device::Mps);
        assert_eq!(" xpu ".parse::<Device>().unwrap(), Device::Xpu);
        assert!(matches!(
            "tpu".parse::<Device>(),
            Err(ConfigError::UnknownDevice(_))
        ));
    }
}
