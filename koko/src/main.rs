use std::path::PathBuf;

use clap::Parser;
use kokoread::{
    config::DEFAULT_OUTPUT_ROOT,
    error::{SynthError, TtsError},
    input::{resolve_input, InputRequest, InputSource, SystemClipboard, DEFAULT_INPUT_FILE},
    onn::ort_base::OrtDeviceProbe,
    playback::{playback_failed_message, playback_skipped_message, PlaybackScheduler, RodioPlayer},
    run::{run, PlaybackOutcome},
    select_device,
    tts::koko::{KokoroOptions, KokoroPipeline, DEFAULT_MODEL_PATH, DEFAULT_VOICES_PATH},
    tts::split::SplitPattern,
    voices::{UnknownVoicePolicy, VoiceAliases},
    Device, Error, RunConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "koko")]
#[command(version, about = "Read text aloud with Kokoro", infer_long_args = false)]
struct Cli {
    /// Text to read. When omitted the clipboard or the input file is used
    input_text: Option<String>,

    /// Label for the generated outputs, replaces the one derived from the input
    #[arg(short = 't', long = "title")]
    title: Option<String>,

    /// Voice alias (pro, hot, asmr, brit) or a model voice id such as am_michael.
    /// Voices can be mixed: af_sarah.4+af_nicole.6
    #[arg(short = 'v', long = "voice")]
    voice: Option<String>,

    /// What to do with a --voice value that is not an alias:
    /// `literal` uses it as a voice id, `default` falls back to `pro`
    #[arg(long = "unknown-voice", value_name = "POLICY", default_value_t = UnknownVoicePolicy::Literal)]
    unknown_voice: UnknownVoicePolicy,

    /// Path to the input text file
    #[arg(
        short = 'i',
        long = "input_file",
        visible_aliases = ["input", "input-file"],
        default_value = DEFAULT_INPUT_FILE
    )]
    input_file: PathBuf,

    /// Use text from the clipboard (i.e., copied text)
    #[arg(short = 'c', long = "clipboard")]
    clipboard: bool,

    /// Device for inference: cuda | mps | xpu | cpu. Picked automatically when omitted
    #[arg(short = 'd', long = "device")]
    device: Option<Device>,

    /// Do not play the generated audio
    #[arg(short = 's', long = "skip_play", visible_alias = "skip-play")]
    skip_play: bool,

    /// Language to synthesize in, as a Kokoro code (a, b, e, f, h, i, j, p, z)
    /// or an espeak id (en-us). Derived from the voice when omitted
    #[arg(long = "force_lang", visible_alias = "force-lang", value_name = "LANG")]
    force_lang: Option<String>,

    /// Rate of speech, as a coefficient of the default
    #[arg(short = 'p', long = "speed", default_value_t = 1.0)]
    speed: f32,

    /// Regex deciding where the text is cut into chunks
    #[arg(long = "split-pattern", value_name = "REGEX")]
    split_pattern: Option<String>,

    /// Directory the per-label output folders are created in
    #[arg(long = "output-dir", default_value = DEFAULT_OUTPUT_ROOT)]
    output_dir: PathBuf,

    /// Path to the Kokoro v1.0 ONNX model on the filesystem
    #[arg(short = 'm', long = "model", value_name = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    model_path: PathBuf,

    /// Path to the voices data file on the filesystem
    #[arg(long = "data", value_name = "DATA_PATH", default_value = DEFAULT_VOICES_PATH)]
    data_path: PathBuf,

    /// Print timing and file diagnostics
    #[arg(long = "verbose")]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "kokoread=debug,koko=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Partially written files are left as they are.
    ctrlc::set_handler(|| {
        println!("Received termination signal, exiting immediately.");
        std::process::exit(130);
    })?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let aliases = VoiceAliases::builtin();
    let voice = aliases.resolve(cli.voice.as_deref(), cli.unknown_voice)?;
    let language = aliases.language_for(&voice, cli.force_lang.as_deref())?;
    let split_pattern = match cli.split_pattern.as_deref() {
        Some(pattern) => SplitPattern::new(pattern)?,
        None => SplitPattern::default(),
    };

    let input = resolve_input(
        &InputRequest {
            text: cli.input_text,
            clipboard: cli.clipboard,
            input_file: cli.input_file,
            title: cli.title,
        },
        &mut SystemClipboard,
    )?;
    if input.source == InputSource::Clipboard {
        println!("Using copied text as input...");
    }

    let device = select_device(cli.device, &OrtDeviceProbe);
    let config = RunConfig::new(input, voice, language, device, split_pattern)
        .with_output_root(cli.output_dir)
        .with_speed(cli.speed)
        .with_skip_play(cli.skip_play)
        .with_verbose(cli.verbose);
    tracing::debug!(
        voice = config.voice(),
        language = config.language().name(),
        lang_code = %config.language().code(),
        label = config.label(),
        split = config.split_pattern().as_str(),
        "run configuration"
    );

    println!("Using {} device...", config.device());
    let pipeline = KokoroPipeline::new(KokoroOptions {
        model_path: cli.model_path,
        voices_path: cli.data_path,
        speed: config.speed(),
        ..KokoroOptions::new(config.device(), config.language())
    })?;

    let outcome = match run(&pipeline, &config, || {
        println!("Now playing generated audio...");
        Ok(PlaybackScheduler::new(RodioPlayer::new()?))
    }) {
        Ok(outcome) => outcome,
        Err(Error::Synth(SynthError::Tts(TtsError::UnknownVoice(voice)))) => {
            eprintln!("Available voices: {}", pipeline.voices().join(", "));
            return Err(TtsError::UnknownVoice(voice).into());
        }
        Err(e) => return Err(e.into()),
    };

    let report = &outcome.synthesis;
    println!(
        "{} chunks generated in {:.2} seconds",
        report.chunks(),
        report.elapsed.as_secs_f32()
    );
    if config.verbose() {
        println!(
            "{:.2}s of audio ({:.2}x real-time)",
            report.audio_secs,
            report.audio_secs / report.elapsed.as_secs_f32().max(f32::EPSILON)
        );
        for path in report.files.iter() {
            println!("  {}", path.display());
        }
    }

    let output_dir = config.output_dir();
    match outcome.playback {
        PlaybackOutcome::Skipped => println!("{}", playback_skipped_message(&output_dir)),
        PlaybackOutcome::Completed(summary) => {
            if config.verbose() {
                println!(
                    "Played {} files ({:.2}s)",
                    summary.files,
                    summary.duration.as_secs_f32()
                );
            }
        }
        PlaybackOutcome::Failed(e) => eprintln!("{}", playback_failed_message(&output_dir, &e)),
    }

    Ok(())
}
