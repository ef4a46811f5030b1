use std::cell::RefCell;
use std::path::Path;

use ort::execution_providers::{
    CPUExecutionProvider, CUDAExecutionProvider, CoreMLExecutionProvider, ExecutionProvider,
    ExecutionProviderDispatch, OpenVINOExecutionProvider,
};
use ort::session::Session;

use crate::device::{Device, DeviceProbe};
use crate::error::TtsError;

/// Shared session handling for ONNX models.
pub trait OrtBase {
    fn set_sess(&mut self, sess: Session);
    fn sess(&self) -> Option<&RefCell<Session>>;

    fn load_model(&mut self, model_path: &Path, device: Device) -> Result<(), TtsError> {
        let builder = Session::builder()?;
        let builder = match device {
            // an explicit accelerator that fails to register is an error,
            // not a silent fall back to the CPU
            Device::Cpu => builder,
            other => builder.with_execution_providers([execution_provider(other).error_on_failure()])?,
        };
        let session = builder.commit_from_file(model_path)?;
        self.set_sess(session);
        Ok(())
    }

    fn print_info(&self) {
        if let Some(sess) = self.sess() {
            let sess = sess.borrow();
            for input in &sess.inputs {
                tracing::debug!("model input: {} {:?}", input.name, input.input_type);
            }
            for output in &sess.outputs {
                tracing::debug!("model output: {} {:?}", output.name, output.output_type);
            }
        } else {
            tracing::debug!("session is not initialized");
        }
    }
}

fn execution_provider(device: Device) -> ExecutionProviderDispatch {
    match device {
        Device::Cuda => CUDAExecutionProvider::default().build(),
        Device::Mps => CoreMLExecutionProvider::default().build(),
        Device::Xpu => OpenVINOExecutionProvider::default().build(),
        Device::Cpu => CPUExecutionProvider::default().build(),
    }
}

/// Asks ONNX Runtime which execution providers this build can use.
/// `mps` maps to CoreML and `xpu` to OpenVINO.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrtDeviceProbe;

impl DeviceProbe for OrtDeviceProbe {
    fn is_available(&self, device: Device) -> bool {
        let available = match device {
            Device::Cuda => CUDAExecutionProvider::default().is_available(),
            Device::Mps => CoreMLExecutionProvider::default().is_available(),
            Device::Xpu => OpenVINOExecutionProvider::default().is_available(),
            Device::Cpu => return true,
        };
        available.unwrap_or(false)
    }
}
