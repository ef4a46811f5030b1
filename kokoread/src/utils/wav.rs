use std::path::Path;
use std::time::Duration;

/// Mono 32-bit float, the format the model produces.
pub fn wav_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    }
}

pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), hound::Error> {
    let mut writer = hound::WavWriter::create(path, wav_spec(sample_rate))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()
}

/// Length of a WAV file from its header.
pub fn wav_duration(path: &Path) -> Result<Duration, hound::Error> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let frames = reader.duration();
    Ok(Duration::from_secs_f64(
        f64::from(frames) / f64::from(spec.sample_rate),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_file_reports_its_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("half-second.wav");
        write_wav(&path, &vec![0.25; 12_000], 24_000).unwrap();

        let duration = wav_duration(&path).unwrap();
        assert_eq!(duration, Duration::from_millis(500));

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec(), wav_spec(24_000));
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("again.wav");
        write_wav(&path, &vec![0.0; 48_000], 24_000).unwrap();
        write_wav(&path, &vec![0.0; 24_000], 24_000).unwrap();
        assert_eq!(wav_duration(&path).unwrap(), Duration::from_secs(1));
    }
}
