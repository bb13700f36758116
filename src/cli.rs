use crate::diagnostics::{self, color::Palette};
use crate::engine::{CompileError, CompilerEngine, RuntimeArtifact, Toolchain};
use crate::lexer::tokenize;
use crate::parser::parse;
use anyhow::{anyhow, bail};
use std::path::{Path, PathBuf};

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub no_color: bool,
}

/// Extensions accepted for Mino source files.
const SOURCE_EXTENSIONS: [&str; 2] = ["mino", "mi"];

/// Validates that the input file has a .mino or .mi extension.
pub fn validate_mino_file(input: &Path) -> anyhow::Result<()> {
    let valid = input
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
    if valid {
        Ok(())
    } else {
        bail!("Input file must have a .mino or .mi extension, but got: {}", input.display());
    }
}

/// Reads a validated source file.
fn read_source(input: &Path) -> anyhow::Result<String> {
    validate_mino_file(input)?;
    std::fs::read_to_string(input)
        .map_err(|e| anyhow!("Could not read {}: {}", input.display(), e))
}

/// Prints the rendered diagnostics and turns the failure into a short error.
fn report(options: &Options, input: &Path, source: &str, err: CompileError) -> anyhow::Error {
    let palette = Palette::for_stderr(options.no_color);
    eprint!("{}", diagnostics::render(input, source, &err, palette));
    anyhow!("could not compile {}", input.display())
}

fn module_name(input: &Path) -> &str {
    input.file_stem().and_then(|s| s.to_str()).unwrap_or("main")
}

pub fn build(
    options: &Options,
    input: PathBuf,
    output: Option<PathBuf>,
    runtime: Option<PathBuf>,
    cc: String,
    keep_asm: bool,
) -> anyhow::Result<()> {
    let source = read_source(&input)?;
    println!("Compiling {}...", input.display());

    let mut toolchain = Toolchain::new(cc);
    if let Some(runtime) = runtime {
        toolchain = toolchain.with_runtime(RuntimeArtifact::from_path(runtime)?);
    }
    let engine = CompilerEngine::new(toolchain).keep_assembly(keep_asm);

    // Determine output path
    let output_path = output.unwrap_or_else(|| input.with_extension("out"));

    let kept = engine
        .compile_to_executable(&source, module_name(&input), &output_path)
        .map_err(|err| report(options, &input, &source, err))?;

    if let Some(asm_path) = kept {
        println!("Assembly kept at: {}", asm_path.display());
    }
    println!("Compiled successfully to: {}", output_path.display());
    Ok(())
}

pub fn asm(options: &Options, input: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    let source = read_source(&input)?;
    println!("Generating assembly for {}...", input.display());

    let asm = CompilerEngine::default()
        .compile_to_assembly(&source)
        .map_err(|err| report(options, &input, &source, err))?;

    let output_path = output.unwrap_or_else(|| input.with_extension("s"));
    std::fs::write(&output_path, asm)?;

    println!("Assembly generated successfully: {}", output_path.display());
    Ok(())
}

pub fn check(options: &Options, input: PathBuf, show_symbols: bool) -> anyhow::Result<()> {
    let source = read_source(&input)?;
    println!("Checking {}...", input.display());

    let (program, symbols) = CompilerEngine::default()
        .check_source(&source)
        .map_err(|err| report(options, &input, &source, err))?;

    if show_symbols {
        print!("{symbols}");
    }
    println!(
        "No errors found ({} functions, {} global symbols)",
        program.functions().count(),
        symbols.len()
    );
    Ok(())
}

pub fn lex(input: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    let source = read_source(&input)?;
    println!("Generating lexer tokens for {}...", input.display());

    let tokens = tokenize(&source);

    // Determine output path
    let output_path = output.unwrap_or_else(|| input.with_extension("lex.json"));

    let json = serde_json::to_string_pretty(&tokens)?;
    std::fs::write(&output_path, json)?;

    println!("Lexer tokens generated successfully: {}", output_path.display());
    Ok(())
}

pub fn ast(options: &Options, input: PathBuf, output: Option<PathBuf>, tree: bool) -> anyhow::Result<()> {
    let source = read_source(&input)?;

    let program = parse(&source)
        .map_err(|err| report(options, &input, &source, err.into()))?;

    if tree {
        print!("{program}");
        return Ok(());
    }

    println!("Generating AST for {}...", input.display());
    let output_path = output.unwrap_or_else(|| input.with_extension("ast.json"));

    let json = serde_json::to_string_pretty(&program)?;
    std::fs::write(&output_path, json)?;

    println!("AST generated successfully: {}", output_path.display());
    Ok(())
}
