#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::cell::Cell;
use std::io::Read;
use std::rc::Rc;

use cli::{render_listing, CliArgs, InputMode, OutputFormat, Source};
use spintax::messages::{EditMsg, Msg};
use spintax::update::update;
use spintax::{Editor, TokenPlugin};

fn read_input(source: &Source) -> Result<String> {
    match source {
        Source::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        Source::Stdin => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

fn main() -> Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let config = CliArgs::parse().into_config();
    spintax::tracing::init(&config.logging);

    if config.init_config {
        let path = config
            .config_target()
            .context("No config directory available; pass --config")?;
        config
            .engine_config()
            .save_to(&path)
            .map_err(anyhow::Error::msg)?;
        eprintln!("Wrote {}", path.display());
        return Ok(());
    }

    let input = read_input(&config.source)?;
    let input = input.strip_suffix('\n').unwrap_or(&input);

    let mut editor = Editor::new(config.engine_config());
    let updates = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&updates);
    let _plugin = TokenPlugin::register(&mut editor, move |_| counter.set(counter.get() + 1))?;

    match config.input_mode {
        InputMode::Whole => {
            update(&mut editor, Msg::Edit(EditMsg::SetText(input.to_string())))?;
        }
        InputMode::Typed => {
            for ch in input.chars() {
                let msg = match ch {
                    '\n' => EditMsg::InsertNewline,
                    ch => EditMsg::InsertChar(ch),
                };
                update(&mut editor, Msg::Edit(msg))?;
            }
        }
    }

    match config.format {
        OutputFormat::Json => println!("{}", editor.to_json()?),
        OutputFormat::Text => print!("{}", render_listing(editor.state())),
    }
    eprintln!(
        "{} token(s) extracted over {} update(s)",
        editor.state().token_count(),
        updates.get()
    );

    Ok(())
}
