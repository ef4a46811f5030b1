use std::borrow::Cow;
use std::cell::RefCell;
use std::path::Path;

use ort::{
    session::{Session, SessionInputValue, SessionInputs, SessionOutputs},
    value::{Tensor, Value},
};

use super::ort_base::OrtBase;
use crate::device::Device;
use crate::error::TtsError;
use crate::tts::tokenize::pad;

/// The Kokoro ONNX graph: `tokens`, `style`, `speed` in, `audio` out.
pub struct OrtKoko {
    sess: Option<RefCell<Session>>,
}

impl OrtBase for OrtKoko {
    fn set_sess(&mut self, sess: Session) {
        self.sess = Some(RefCell::new(sess));
    }

    fn sess(&self) -> Option<&RefCell<Session>> {
        self.sess.as_ref()
    }
}

impl OrtKoko {
    pub fn new(model_path: &Path, device: Device) -> Result<Self, TtsError> {
        let mut instance = OrtKoko { sess: None };
        instance.load_model(model_path, device)?;
        Ok(instance)
    }

    /// Runs one utterance. `tokens` are unpadded; the pad token is added on
    /// both sides here.
    pub fn infer(&self, tokens: &[i64], style: Vec<f32>, speed: f32) -> Result<Vec<f32>, TtsError> {
        let sess_cell = self.sess.as_ref().ok_or(TtsError::SessionMissing)?;

        let padded = pad(tokens);
        let tokens = Tensor::from_array(([1usize, padded.len()], padded))?;
        let tokens_value: SessionInputValue = SessionInputValue::Owned(Value::from(tokens));

        let style = Tensor::from_array(([1usize, style.len()], style))?;
        let style_value: SessionInputValue = SessionInputValue::Owned(Value::from(style));

        let speed = Tensor::from_array(([1usize], vec![speed]))?;
        let speed_value: SessionInputValue = SessionInputValue::Owned(Value::from(speed));

        let inputs: Vec<(Cow<str>, SessionInputValue)> = vec![
            (Cow::Borrowed("tokens"), tokens_value),
            (Cow::Borrowed("style"), style_value),
            (Cow::Borrowed("speed"), speed_value),
        ];

        let mut sess = sess_cell.borrow_mut();
        let outputs: SessionOutputs = sess.run(SessionInputs::from(inputs))?;
        let (_shape, data) = outputs["audio"].try_extract_tensor::<f32>()?;
        Ok(data.to_vec())
    }
}
