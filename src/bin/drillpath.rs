use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use drillpath::{Distributor, ItemId, Path, SvgCommand};

#[derive(Parser, Debug)]
#[command(name = "drillpath", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a path string and print its normalized form.
    Validate(ValidateArgs),
    /// Distribute N items evenly along a path and print their positions.
    Distribute(DistributeArgs),
    /// Append a continuation segment to a path.
    Append(AppendArgs),
    /// Change one segment's command, keeping its end point.
    Retype(RetypeArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Path string, e.g. "M 0 0 L 100 100".
    path: String,
}

#[derive(Parser, Debug)]
struct DistributeArgs {
    /// Path string to distribute along.
    path: String,

    /// Number of items to place.
    #[arg(long)]
    items: usize,

    /// Emit positions as a JSON array instead of plain lines.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct AppendArgs {
    /// Path string to extend.
    path: String,
}

#[derive(Parser, Debug)]
struct RetypeArgs {
    /// Path string to edit.
    path: String,

    /// Segment index to retype (0 is the leading move and cannot change).
    #[arg(long)]
    index: usize,

    /// New segment command.
    #[arg(long, value_enum)]
    to: CommandChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CommandChoice {
    Line,
    Quad,
    Cubic,
}

impl From<CommandChoice> for SvgCommand {
    fn from(choice: CommandChoice) -> SvgCommand {
        match choice {
            CommandChoice::Line => SvgCommand::Line,
            CommandChoice::Quad => SvgCommand::Quadratic,
            CommandChoice::Cubic => SvgCommand::Cubic,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Distribute(args) => cmd_distribute(args),
        Command::Append(args) => cmd_append(args),
        Command::Retype(args) => cmd_retype(args),
    }
}

fn parse_path(raw: &str) -> anyhow::Result<Path> {
    Path::parse(raw).with_context(|| format!("parse path '{raw}'"))
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let path = parse_path(&args.path)?;
    println!("{path}");
    eprintln!(
        "{} segment(s), {} point(s)",
        path.segment_count(),
        path.point_count()
    );
    Ok(())
}

fn cmd_distribute(args: DistributeArgs) -> anyhow::Result<()> {
    let path = parse_path(&args.path)?;
    let ids: Vec<ItemId> = (0..args.items as i64).map(ItemId).collect();
    let placed = Distributor::default().distribute(&path, &ids)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&placed)?);
    } else {
        for item in &placed {
            println!("{} {} {}", item.id.0, item.position.x, item.position.y);
        }
    }
    Ok(())
}

fn cmd_append(args: AppendArgs) -> anyhow::Result<()> {
    let path = parse_path(&args.path)?;
    println!("{}", path.append_segment());
    Ok(())
}

fn cmd_retype(args: RetypeArgs) -> anyhow::Result<()> {
    let path = parse_path(&args.path)?;
    let edited = path
        .retype_segment(args.index, args.to.into())
        .with_context(|| format!("retype segment {}", args.index))?;
    println!("{edited}");
    Ok(())
}
