use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use qrmask::config::{MaskJob, RenderConfig};
use qrmask::{Mask, MaskPattern, Matrix, NopWriter, Writer};

mod render_png;
mod terminal;

/// QR code mask pattern CLI
#[derive(Parser)]
#[command(name = "qrmask", version)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the eight mask patterns
    Patterns,
    /// Apply a mask pattern to a matrix file
    Apply {
        /// Matrix file: rows of '.', '#'/'1', '_'/'0'
        #[arg(long)]
        input: String,
        /// Mask pattern (0-7); required unless --config sets it
        #[arg(long)]
        pattern: Option<u8>,
        /// TOML job file with pattern and render settings
        #[arg(long)]
        config: Option<String>,
        /// Output format: terminal, png, none
        #[arg(long, default_value = "terminal")]
        format: String,
        /// Pixels per module (png)
        #[arg(long)]
        scale: Option<usize>,
        /// Quiet zone width in modules
        #[arg(long)]
        border: Option<usize>,
        /// Output file path (png)
        #[arg(short, long, default_value = "masked.png")]
        output: String,
        /// Data-filled matrix to apply the mask to instead of printing the mask
        #[arg(long)]
        data: Option<String>,
    },
    /// Show a pattern over an empty matrix
    Preview {
        #[arg(long, default_value = "21")]
        width: usize,
        #[arg(long, default_value = "21")]
        height: usize,
        /// Mask pattern (0-7)
        #[arg(long, default_value = "0")]
        pattern: u8,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(cli.verbose, rust_log.as_deref()))
        .init();

    match cli.command {
        Command::Patterns => cmd_patterns(),
        Command::Apply {
            input,
            pattern,
            config,
            format,
            scale,
            border,
            output,
            data,
        } => {
            let base = config.as_deref().map(load_job).transpose()?;
            let job = resolve_job(pattern, base, scale, border)?;
            cmd_apply(&input, data.as_deref(), &job, &format, &output)
        }
        Command::Preview {
            width,
            height,
            pattern,
        } => cmd_preview(width, height, pattern),
    }
}

/// `RUST_LOG` directives when set, otherwise `warn` (`debug` with `-v`).
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(rust_log.unwrap_or_default())
}

fn load_job(path: &str) -> Result<MaskJob> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    MaskJob::from_toml(&text).with_context(|| format!("parsing {}", path))
}

/// Merge the optional TOML job with command-line flags. Flags win.
fn resolve_job(
    pattern: Option<u8>,
    base: Option<MaskJob>,
    scale: Option<usize>,
    border: Option<usize>,
) -> Result<MaskJob> {
    let pattern = match (pattern, &base) {
        (Some(p), _) => MaskPattern::try_from(p)?,
        (None, Some(job)) => job.pattern,
        (None, None) => anyhow::bail!("no mask pattern given, use --pattern or --config"),
    };

    let defaults = base.map(|job| job.render).unwrap_or_default();
    Ok(MaskJob {
        pattern,
        render: RenderConfig {
            scale: scale.unwrap_or(defaults.scale),
            border: border.unwrap_or(defaults.border),
        },
    })
}

fn load_matrix(path: &str) -> Result<Matrix> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    Matrix::from_data_string(&text).with_context(|| format!("parsing matrix from {}", path))
}

fn cmd_patterns() -> Result<()> {
    println!("{:<8} Formula (true = invert)", "Pattern");
    println!("{}", "-".repeat(52));
    for p in MaskPattern::ALL {
        println!("{:<8} {}", p.index(), p.formula());
    }
    Ok(())
}

fn cmd_apply(
    input: &str,
    data: Option<&str>,
    job: &MaskJob,
    format: &str,
    output: &str,
) -> Result<()> {
    let function = load_matrix(input)?;
    let mask = Mask::new(&function, job.pattern)
        .with_context(|| format!("applying pattern {}", job.pattern.index()))?;

    let result = match data {
        Some(path) => {
            let data = load_matrix(path)?;
            mask.apply_to(&data)
                .with_context(|| format!("applying mask to {}", path))?
        }
        None => mask.into_matrix(),
    };

    let mut writer: Box<dyn Writer> = match format {
        "terminal" => Box::new(terminal::TerminalWriter::new(
            std::io::stdout().lock(),
            job.render.border,
        )),
        "png" => Box::new(render_png::PngWriter::new(
            output,
            job.render.scale,
            job.render.border,
        )),
        "none" => Box::new(NopWriter),
        _ => anyhow::bail!("unknown format '{}', use 'terminal', 'png' or 'none'", format),
    };

    qrmask::write_and_close(&mut writer, &result).context("writing output")?;
    if format == "png" {
        println!("wrote {}", output);
    }
    Ok(())
}

fn cmd_preview(width: usize, height: usize, pattern: u8) -> Result<()> {
    let matrix = Matrix::try_new(width, height)?;
    let mask = Mask::from_mode(&matrix, pattern)?;
    let mut writer = terminal::TerminalWriter::new(std::io::stdout().lock(), 1);
    qrmask::write_and_close(&mut writer, mask.matrix()).context("writing preview")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::Layer;
    use tracing_subscriber::Registry;

    fn max_level(filter: &EnvFilter) -> Option<tracing::level_filters::LevelFilter> {
        <EnvFilter as Layer<Registry>>::max_level_hint(filter)
    }

    fn job(pattern: MaskPattern, scale: usize, border: usize) -> MaskJob {
        MaskJob {
            pattern,
            render: RenderConfig { scale, border },
        }
    }

    #[test]
    fn log_filter_defaults_to_warn() {
        let f = log_filter(false, None);
        assert_eq!(max_level(&f), Some(tracing::level_filters::LevelFilter::WARN));
    }

    #[test]
    fn log_filter_verbose_is_debug() {
        let f = log_filter(true, None);
        assert_eq!(max_level(&f), Some(tracing::level_filters::LevelFilter::DEBUG));
    }

    #[test]
    fn log_filter_rust_log_global_level_wins() {
        let f = log_filter(false, Some("debug"));
        assert_eq!(max_level(&f), Some(tracing::level_filters::LevelFilter::DEBUG));

        let f = log_filter(true, Some("error"));
        assert_eq!(max_level(&f), Some(tracing::level_filters::LevelFilter::ERROR));
    }

    #[test]
    fn resolve_job_flags_override_config() {
        let base = job(MaskPattern::Pattern3, 4, 2);
        let got = resolve_job(Some(5), Some(base), Some(8), None).unwrap();
        assert_eq!(got, job(MaskPattern::Pattern5, 8, 2));
    }

    #[test]
    fn resolve_job_uses_config_values() {
        let base = job(MaskPattern::Pattern6, 3, 1);
        let got = resolve_job(None, Some(base.clone()), None, None).unwrap();
        assert_eq!(got, base);
    }

    #[test]
    fn resolve_job_flags_only_use_render_defaults() {
        let got = resolve_job(Some(1), None, None, Some(0)).unwrap();
        assert_eq!(got.pattern, MaskPattern::Pattern1);
        assert_eq!(got.render.scale, RenderConfig::default().scale);
        assert_eq!(got.render.border, 0);
    }

    #[test]
    fn resolve_job_without_pattern_fails() {
        let err = resolve_job(None, None, Some(2), Some(2)).unwrap_err();
        assert!(err.to_string().contains("no mask pattern"));
    }

    #[test]
    fn resolve_job_rejects_unknown_pattern_flag() {
        assert!(resolve_job(Some(8), None, None, None).is_err());
    }

    #[test]
    fn load_job_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.toml");
        std::fs::write(&path, "pattern = 2\n[render]\nscale = 6\n").unwrap();
        let got = load_job(path.to_str().unwrap()).unwrap();
        assert_eq!(got, job(MaskPattern::Pattern2, 6, 4));
    }
}
