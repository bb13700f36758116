use clap::Parser;
use mino::cli;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "minoc")]
#[command(version, about = "Ahead-of-time compiler for the Mino language, targeting x86-64 assembly")]
struct Cli {
    /// Disable colored diagnostics (also honours NO_COLOR)
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Compile a Mino file to an executable
    #[command(alias = "b")]
    Build {
        /// Input file to compile
        input: PathBuf,

        /// Output executable (defaults to the input name with .out)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Runtime providing initSystem and the sys_* routines (.a, .o or .c)
        #[arg(long, env = "MINO_RUNTIME")]
        runtime: Option<PathBuf>,

        /// C compiler driver used to assemble and link
        #[arg(long, env = "MINO_CC", default_value = mino::engine::DEFAULT_CC)]
        cc: String,

        /// Keep the generated assembly next to the executable
        #[arg(long)]
        keep_asm: bool,
    },

    /// Write the generated assembly for a Mino file
    #[command(alias = "s")]
    Asm {
        /// Input file
        input: PathBuf,

        /// Output assembly file (defaults to the input name with .s)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse and type-check a Mino file without generating code
    #[command(alias = "c")]
    Check {
        /// Input file
        input: PathBuf,

        /// Print the global symbol table
        #[arg(long)]
        symbols: bool,
    },

    /// Generate lexer tokens JSON from a Mino file
    #[command(alias = "l")]
    Lex {
        /// Input file
        input: PathBuf,

        /// Output JSON file name (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate AST JSON from a Mino file
    #[command(alias = "a")]
    Ast {
        /// Input file
        input: PathBuf,

        /// Output JSON file name (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print an indented tree instead of writing JSON
        #[arg(long)]
        tree: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let options = cli::Options { no_color: cli.no_color };

    match cli.command {
        Commands::Build { input, output, runtime, cc, keep_asm } => {
            cli::build(&options, input, output, runtime, cc, keep_asm)?;
        }
        Commands::Asm { input, output } => {
            cli::asm(&options, input, output)?;
        }
        Commands::Check { input, symbols } => {
            cli::check(&options, input, symbols)?;
        }
        Commands::Lex { input, output } => {
            cli::lex(input, output)?;
        }
        Commands::Ast { input, output, tree } => {
            cli::ast(&options, input, output, tree)?;
        }
    }

    Ok(())
}
