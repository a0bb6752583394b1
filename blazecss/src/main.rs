use anyhow::Context;
use blazecss_lib::{blaze_generate, FontMatchPolicy, ReduceConfig};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

const BLAZECSS_INTRO: &str = r#"
        ____  __                 ________________
       / __ )/ /___ _____  ___  / ____/ ___/ ___/
      / __  / / __ `/_  / / _ \/ /    \__ \\__ \
     / /_/ / / /_/ / / /_/  __/ /___ ___/ /__/ /
    /_____/_/\__,_/ /___/\___/\____//____/____/

    Welcome to BlazeCSS - strip the CSS your page never uses!
"#;

#[derive(Parser)]
#[command(name = "BlazeCSS")]
#[command(about = "Remove CSS rules, fonts and animations an HTML page does not use")]
struct Args {
    /// HTML document the stylesheet is reduced against.
    html: PathBuf,

    /// Stylesheet to reduce.
    css: PathBuf,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// URL the document was loaded from.
    #[arg(long)]
    url: Option<String>,

    /// Keep every rule whose selector matches this regex. Repeatable.
    #[arg(long = "force-include", value_name = "REGEX")]
    force_include: Vec<String>,

    /// How `@font-face` blocks are matched against used fonts.
    #[arg(long, default_value_t = FontMatchPolicy::Descriptor)]
    font_policy: FontMatchPolicy,

    /// Skip invalid CSS instead of failing.
    #[arg(long)]
    recover: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    eprintln!("{}", BLAZECSS_INTRO);

    // parse the args given in terminal
    let args: Args = Args::parse();

    let html_content = fs::read_to_string(&args.html)
        .with_context(|| format!("reading HTML file {}", args.html.display()))?;
    let css_content = fs::read_to_string(&args.css)
        .with_context(|| format!("reading CSS file {}", args.css.display()))?;

    let mut config = ReduceConfig::new()
        .with_force_include(&args.force_include)?
        .with_font_policy(args.font_policy)
        .with_error_recovery(args.recover);
    if let Some(url) = &args.url {
        config = config.with_document_url(url)?;
    }

    let generated = blaze_generate::generate(&html_content, &css_content, &config)?;
    log::info!("{:?}", generated.report);

    match &args.output {
        Some(path) => {
            fs::write(path, &generated.css)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote reduced stylesheet to {}", path.display());
        }
        None => print!("{}", generated.css),
    }
    Ok(())
}
