//! speech-cloud-cli: 语音云命令行工具，列出音色与词典、生成语音 URL 或音频文件。
//!
//! Usage:
//!   speech-cloud-cli voices [--language <code>]      List available voices
//!   speech-cloud-cli lexicons                        List lexicon names
//!   speech-cloud-cli lexicon <name>                  Print a lexicon
//!   speech-cloud-cli url <voice> <text>              Print a presigned speech URL
//!   speech-cloud-cli speak <voice> <text> --out <f>  Synthesize speech into a file

use speech_cloud_rust::types::OutputFormat;
use speech_cloud_rust::{FileSpeechHandler, GetLexiconRequest, ListVoicesRequest, SpeechCloudFacade};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "version" | "--version" | "-V" => {
            println!("speech-cloud-cli {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return Ok(());
        }
        _ => {}
    }

    let facade = build_facade(&args[2..]).await?;
    match args[1].as_str() {
        "voices" => cmd_voices(&facade, &args[2..]).await,
        "lexicons" => cmd_lexicons(&facade).await,
        "lexicon" => cmd_lexicon(&facade, &args[2..]).await,
        "url" => cmd_url(&facade, &args[2..]).await,
        "speak" => cmd_speak(&facade, &args[2..]).await,
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"speech-cloud-cli: Speech Cloud 命令行工具

USAGE:
    speech-cloud-cli <COMMAND> [OPTIONS]

COMMANDS:
    voices [--language <code>]          List available voices
    lexicons                            List lexicon names
    lexicon <name>                      Print a lexicon
    url <voice> <text>                  Print a presigned speech URL
    speak <voice> <text> --out <file>   Synthesize speech into a local file
    version                             Show version information
    help                                Show this help message

OPTIONS:
    --config <path>                     YAML configuration file
    --codec <MP3|OGG|MP4>               Audio codec for url / speak

ENVIRONMENT:
    IVONA_CONFIG                        Configuration file path
    IVONA_ACCESS_KEY / IVONA_SECRET_KEY Credentials (when not in the keyring)
    IVONA_ENDPOINT, IVONA_REGION        Endpoint overrides
    RUST_LOG                            Log filter"#
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Positional arguments, skipping flags and their values.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
        } else if arg.starts_with("--") {
            skip = true;
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

async fn build_facade(args: &[String]) -> anyhow::Result<SpeechCloudFacade> {
    let config_path = flag_value(args, "--config")
        .map(String::from)
        .or_else(|| std::env::var("IVONA_CONFIG").ok());

    let mut builder = SpeechCloudFacade::builder();
    if let Some(path) = config_path {
        builder = builder.config_file(path).await?;
    }
    let mut facade = builder.build()?;
    if let Some(codec) = flag_value(args, "--codec") {
        let format = OutputFormat {
            codec: codec.parse()?,
            ..facade.output_format()
        };
        facade = facade.with_output_format(format);
    }
    Ok(facade)
}

async fn cmd_voices(facade: &SpeechCloudFacade, args: &[String]) -> anyhow::Result<()> {
    let selector = flag_value(args, "--language").map(|l| ListVoicesRequest::new().with_language(l));
    let voices = facade.list_voices(selector).await?;
    for voice in voices {
        println!(
            "{:<12} {:<8} {}",
            voice.name,
            voice.language.as_deref().unwrap_or("-"),
            voice
                .gender
                .map(|g| format!("{:?}", g))
                .unwrap_or_else(|| "-".to_string())
        );
    }
    Ok(())
}

async fn cmd_lexicons(facade: &SpeechCloudFacade) -> anyhow::Result<()> {
    let names = facade.list_lexicon_names().await?;
    if names.is_empty() {
        println!("(no lexicons)");
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

async fn cmd_lexicon(facade: &SpeechCloudFacade, args: &[String]) -> anyhow::Result<()> {
    let pos = positional(args);
    let Some(name) = pos.first() else {
        anyhow::bail!("usage: speech-cloud-cli lexicon <name>");
    };
    let lexicon = facade.get_lexicon(Some(GetLexiconRequest::new(*name))).await?;
    println!("{}", lexicon.contents);
    Ok(())
}

async fn cmd_url(facade: &SpeechCloudFacade, args: &[String]) -> anyhow::Result<()> {
    let pos = positional(args);
    let (Some(voice), Some(text)) = (pos.first(), pos.get(1)) else {
        anyhow::bail!("usage: speech-cloud-cli url <voice> <text>");
    };
    let url = facade.create_speech_url(voice, text).await?;
    println!("{url}");
    Ok(())
}

async fn cmd_speak(facade: &SpeechCloudFacade, args: &[String]) -> anyhow::Result<()> {
    let pos = positional(args);
    let (Some(voice), Some(text), Some(out)) = (pos.first(), pos.get(1), flag_value(args, "--out"))
    else {
        anyhow::bail!("usage: speech-cloud-cli speak <voice> <text> --out <file>");
    };
    let handler = FileSpeechHandler::new(out);
    let result = facade.create_speech_and_handle(voice, text, &handler).await?;
    println!(
        "wrote {} bytes to {} (request id: {})",
        handler.bytes_written(),
        out,
        result.metadata().request_id.as_deref().unwrap_or("-")
    );
    Ok(())
}
