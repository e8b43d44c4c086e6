use clap::Parser;

/// StitchFlow: shows who else is looking at the same project, and where.
#[derive(Parser, Debug)]
#[command(name = "stitchflow", version, about)]
pub struct Args {
    /// Project to join.
    #[arg(short, long)]
    pub project: String,

    /// Display name shown to other viewers.
    #[arg(short, long)]
    pub name: String,

    /// Stable user id. A random one is generated when omitted.
    #[arg(long)]
    pub user_id: Option<String>,

    /// Display color (hex, e.g. #10b981).
    #[arg(long)]
    pub color: Option<String>,

    /// Relay hub URL. Overrides `relay.url` and implies connecting.
    #[arg(long)]
    pub relay: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
