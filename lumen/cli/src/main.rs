use clap::{CommandFactory, Parser};
use color_eyre::eyre::{Context, Result, eyre};
use lumen_cli::Cli;
use lumen_cli::repl::{self, Session, format_context, preview_path};
use lumen_lib::document::MermaidMode;
use lumen_lib::markdown::highlighting::{
    CODE_THEME_ENV, ColorMode, THEME_ENV, ThemePair, env_color_mode, env_theme,
};
use lumen_lib::markdown::output::{HtmlOptions, as_page};
use lumen_lib::preferences::{PreferenceStore, Preferences};
use lumen_lib::search::Direction;
use lumen_lib::source::{self, CachePolicy, DocumentCache, DocumentSource, Origin};
use lumen_lib::viewer::{Viewer, ViewerEvent};
use std::io::{self, IsTerminal};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber based on verbosity level.
///
/// Verbosity levels:
/// - 0 (default): silent unless `RUST_LOG` is set
/// - 1 (-v): INFO (theme detection, fetches, cache decisions)
/// - 2 (-vv): DEBUG (search cycles, cache hits)
/// - 3 (-vvv): TRACE (queued viewer events)
/// - 4+ (-vvvv): TRACE with file/line numbers
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => return,
            1 => "warn,lumen=info,lumen_lib=info".to_string(),
            2 => "info,lumen=debug,lumen_lib=debug".to_string(),
            _ => "debug,lumen=trace,lumen_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(verbose >= 4)
                .with_line_number(verbose >= 4)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "lumen", &mut io::stdout());
        return Ok(());
    }

    if cli.list_themes {
        list_themes();
        return Ok(());
    }

    let store = PreferenceStore::default_location();
    let mut preferences = store
        .load()
        .wrap_err_with(|| format!("Failed to read preferences from {}", store.path().display()))?;

    if cli.toggle_theme {
        let updated = store
            .update(|p| p.color_mode = p.color_mode.toggled())
            .wrap_err("Failed to save preferences")?;
        println!("Color mode: {}", updated.color_mode);
        return Ok(());
    }

    if let Some(mode) = cli.color_mode {
        preferences = store
            .update(|p| p.color_mode = mode)
            .wrap_err("Failed to save preferences")?;
        tracing::info!(mode = %mode, "Saved color mode");
    }

    let options = resolve_options(&cli, &preferences);

    let source = match cli.source.as_deref() {
        Some(arg) => arg
            .parse::<DocumentSource>()
            .wrap_err_with(|| format!("Invalid source: {arg}"))?,
        None => DocumentSource::default(),
    };
    let policy = if cli.no_cache {
        CachePolicy::Bypass
    } else if cli.refresh {
        CachePolicy::Refresh
    } else {
        CachePolicy::Prefer
    };
    let cache = DocumentCache::default_location();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("Failed to start async runtime")?;
    let loaded = runtime
        .block_on(source::load(&source, Some(&cache), policy))
        .wrap_err_with(|| format!("Failed to load {source}"))?;
    if loaded.origin == Origin::StaleCache {
        eprintln!("Warning: could not fetch {source}, showing a cached copy");
    }
    tracing::info!(origin = %loaded.origin, "Loaded document");

    let document = loaded
        .markdown
        .as_document(&options.parse_options())
        .wrap_err("Failed to render markdown")?;
    let mut viewer = Viewer::new(document, options.color_mode);

    if cli.interactive {
        let mut session = Session::new(viewer, options).with_preferences(store);
        if let Some(query) = cli.search {
            session.execute(repl::Command::Search(query), &mut io::stdout())?;
        }
        return repl::run(&mut session, io::stdin().lock(), io::stdout());
    }

    if let Some(query) = cli.search.as_deref() {
        viewer.dispatch(ViewerEvent::QueryChanged(query.to_string()));
    }

    if cli.matches {
        return print_matches(&mut viewer, cli.json);
    }

    let page = as_page(viewer.document(), &options, cli.search.as_deref())
        .wrap_err("Failed to render page")?;

    if let Some(path) = &cli.output {
        std::fs::write(path, &page)
            .wrap_err_with(|| format!("Failed to write to {}", path.display()))?;
        eprintln!("Saved page to {}", path.display());
        return Ok(());
    }

    let show = cli.show_html || (!cli.html && io::stdout().is_terminal());
    if show {
        let temp_path = preview_path();
        std::fs::write(&temp_path, &page).wrap_err("Failed to write temp HTML file")?;

        // Non-blocking open, graceful error handling
        if let Err(e) = open::that(&temp_path) {
            eprintln!("Failed to open browser: {}", e);
            eprintln!("Preview available at: {}", temp_path.display());
        }
        return Ok(());
    }

    println!("{}", page);
    Ok(())
}

/// Builds the render options: flags, then environment, then preferences.
fn resolve_options(cli: &Cli, preferences: &Preferences) -> HtmlOptions {
    let prose_theme = cli
        .theme
        .or_else(|| env_theme(THEME_ENV))
        .or(preferences.theme)
        .unwrap_or(ThemePair::OneHalf);
    let code_theme = cli
        .code_theme
        .or_else(|| env_theme(CODE_THEME_ENV))
        .or(preferences.code_theme)
        .unwrap_or(prose_theme);
    let color_mode = cli
        .color_mode
        .or_else(env_color_mode)
        .unwrap_or(preferences.color_mode);

    tracing::info!(
        prose_theme = %prose_theme.kebab_name(),
        code_theme = %code_theme.kebab_name(),
        color_mode = %color_mode,
        "Resolved render options"
    );

    let mut options = HtmlOptions::default();
    options.prose_theme = prose_theme;
    options.code_theme = code_theme;
    options.color_mode = color_mode;
    options.mermaid_mode = if cli.no_mermaid {
        MermaidMode::Code
    } else {
        MermaidMode::Diagram
    };
    options
}

/// Prints every match with its surrounding text.
fn print_matches(viewer: &mut Viewer, json: bool) -> Result<()> {
    let count = viewer.search().match_count();
    let mut listed = Vec::with_capacity(count);
    for _ in 0..count {
        let current = viewer
            .search()
            .current()
            .copied()
            .ok_or_else(|| eyre!("Match cursor lost"))?;
        listed.push((current, viewer.context(40)));
        viewer.dispatch(ViewerEvent::Advance(Direction::Next));
    }

    if json {
        let matches: Vec<_> = listed
            .iter()
            .enumerate()
            .map(|(index, (m, context))| {
                serde_json::json!({
                    "index": index,
                    "segment": m.segment,
                    "start": m.start,
                    "end": m.end,
                    "context": context,
                })
            })
            .collect();
        let report = serde_json::json!({
            "query": viewer.search().query(),
            "count": count,
            "matches": matches,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if count == 0 {
        println!("No matches for '{}'", viewer.search().query());
        return Ok(());
    }
    for (index, (_, context)) in listed.iter().enumerate() {
        let snippet = context.as_ref().map(format_context).unwrap_or_default();
        println!("{:>4}  {}", index + 1, snippet);
    }
    println!(
        "\n{} match{}",
        count,
        if count == 1 { "" } else { "es" }
    );
    Ok(())
}

/// Lists all available themes with descriptions.
fn list_themes() {
    println!("Available themes:\n");
    for theme_pair in ThemePair::all() {
        println!(
            "  {:20} {}{}",
            theme_pair.kebab_name(),
            theme_pair.description(ColorMode::Dark),
            if theme_pair.has_light_variant() { "" } else { " (dark only)" }
        );
    }
    println!("\nUse --theme <name> to set prose theme");
    println!("Use --code-theme <name> to override code theme");
}
