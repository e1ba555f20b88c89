use anyhow::{anyhow, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{Config, WriteLogger};
use std::path::{Path, PathBuf};

// Import from pdftutor-core
use pdftutor_core::{
    FileAnnotationStore, PageLayout, RenderWorker, StaticSurface, TutorConfig, TutorPrompt,
};

use pdftutor_cli::ReplayReport;

#[derive(Parser)]
#[command(name = "pdftutor")]
#[command(about = "Extract AI tutor annotation commands and replay them against a PDF page layout")]
struct Args {
    /// Path to a saved model response (Markdown with annotation blocks)
    #[arg(short, long)]
    response: Option<String>,

    /// Path to recorded page layouts (JSON) produced by the renderer
    #[arg(short, long)]
    layout: Option<String>,

    /// Number of pages in the document (default: last page in the layout file)
    #[arg(short, long)]
    pages: Option<u32>,

    /// Output file path (if not specified, auto-generated based on response)
    #[arg(short, long)]
    output: Option<String>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Persist annotation records as JSON under this directory
    #[arg(long)]
    store_dir: Option<String>,

    /// Print the tutor prompt for --document/--question and exit
    #[arg(long)]
    prompt: bool,

    /// Plain-text document content used as prompt context
    #[arg(long)]
    document: Option<String>,

    /// Document title used in the prompt
    #[arg(long, default_value = "Untitled document")]
    title: String,

    /// Student question used in the prompt
    #[arg(long)]
    question: Option<String>,

    /// Text layer renderer version the layouts were recorded with
    #[arg(long, default_value = "4.4.168")]
    renderer_version: String,

    /// Show available config options and exit
    #[arg(long)]
    show_configs: bool,

    /// Log match traces to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    WriteLogger::init(
        if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        },
        Config::default(),
        std::io::stderr(),
    )?;

    if args.show_configs {
        show_help();
        return Ok(());
    }

    let config_path = args.config.clone().or_else(default_config_path);
    let config = TutorConfig::load_with_fallback(config_path.as_deref());

    if args.prompt {
        return print_prompt(&args, &config);
    }

    println!("🎓 PDF Tutor Annotation Replay");

    match &config_path {
        Some(path) => println!("📋 Loaded config from: {}", path),
        None => println!("📋 Using default config"),
    }

    let Some(response_path) = &args.response else {
        println!("⚠️  No response given. Pass --response <file> or see --show-configs.");
        return Ok(());
    };
    if !Path::new(response_path).exists() {
        println!("⚠️  Response not found at: {}", response_path);
        println!("   Please check the file path.");
        return Ok(());
    }
    let response = std::fs::read_to_string(response_path)
        .map_err(|e| anyhow!("Failed to read response {}: {}", response_path, e))?;

    let worker = RenderWorker::configure(&args.renderer_version);
    info!("Render worker: {}", worker.worker_src());
    let surface = match &args.layout {
        Some(path) => {
            println!("📐 Page layouts: {}", path);
            StaticSurface::load_from_file(&worker, path)?
        }
        None => StaticSurface::new(&worker),
    };

    let page_count = args.pages.or_else(|| surface.last_page()).unwrap_or(1);
    println!("📄 Processing: {} ({} pages)", response_path, page_count);

    let report = ReplayReport::build(&response, &surface, page_count, &config);

    println!("✅ Replay finished");
    println!("📊 Directives:");
    println!("   - Extracted: {}", report.directives.len());
    println!("   - Applied: {}", report.summary.applied);
    println!("   - Ignored: {}", report.summary.ignored);
    println!("   - Waiting for layout: {}", report.summary.waiting);
    println!("   - Highlights: {}", report.highlights.len());
    println!("   - Current page: {}", report.current_page);

    if let Some(store_dir) = &args.store_dir {
        let store = FileAnnotationStore::new(store_dir)?;
        let stored = report.persist(&store)?;
        println!("🗂️  Stored {} annotations for message {}", stored, report.message_id);
    }

    let output_path = args.output.clone().unwrap_or_else(|| {
        let stem = Path::new(response_path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("response");
        format!("{stem}_annotations.json")
    });
    report.save(&output_path)?;
    println!("💾 Report saved to: {}", output_path);

    Ok(())
}

fn default_config_path() -> Option<String> {
    let path: PathBuf = dirs::config_dir()?.join("pdftutor").join("config.yaml");
    if path.exists() {
        path.to_str().map(str::to_string)
    } else {
        None
    }
}

fn print_prompt(args: &Args, config: &TutorConfig) -> Result<()> {
    let question = args
        .question
        .as_deref()
        .ok_or_else(|| anyhow!("--prompt needs --question"))?;
    let document_text = match &args.document {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read document {}: {}", path, e))?,
        None => String::new(),
    };

    let prompt = TutorPrompt::new(&args.title, &document_text, question).render(&config.prompt);
    println!("{prompt}");
    Ok(())
}

fn show_help() {
    println!("\n📋 Available Configuration Options:");
    println!("  --response <path>         Saved model response to process");
    println!("  --layout <path>           Recorded page layouts (JSON)");
    println!("  --pages <n>               Document page count (default: last page in layout)");
    println!("  --output <path>           Report path (auto-generated if not specified)");
    println!("  --config <path>           Load custom config file");
    println!("  --store-dir <dir>         Persist annotation records under <dir>/annotations");
    println!("  --prompt                  Print the tutor prompt and exit");
    println!("  --document <path>         Document text for the prompt");
    println!("  --title <text>            Document title for the prompt");
    println!("  --question <text>         Student question for the prompt");
    println!("  --renderer-version <v>    Text layer renderer version");

    let defaults = TutorConfig::default();
    println!("\n⚙️  Config file sections (YAML, all fields optional):");
    println!("  extractor.normalize_markdown     {}", defaults.extractor.normalize_markdown);
    println!("  resolver.min_width               {}", defaults.resolver.min_width);
    println!("  resolver.min_height              {}", defaults.resolver.min_height);
    println!("  resolver.prefix_chars            {}", defaults.resolver.prefix_chars);
    println!("  resolver.min_prefix_phrase_chars {}", defaults.resolver.min_prefix_phrase_chars);
    println!("  resolver.min_word_chars          {}", defaults.resolver.min_word_chars);
    println!("  resolver.default_color           {}", defaults.resolver.default_color);
    println!("  prompt.context_char_limit        {}", defaults.prompt.context_char_limit);
    println!("  storage.default_color            {}", defaults.storage.default_color);
    println!("  storage.created_by               {}", defaults.storage.created_by);

    println!("\n📐 Layout file format:");
    println!("  {}", layout_example());

    println!("\n📝 Usage Examples:");
    println!("  cargo run -- -r answer.md -l layouts.json");
    println!("  cargo run -- -r answer.md -l layouts.json --store-dir ~/.cache/pdftutor");
    println!("  cargo run -- --prompt --document notes.txt --title \"Biology\" --question \"What is ATP?\"");
}

fn layout_example() -> String {
    let example = serde_json::json!({
        "pages": [{
            "page": 1,
            "origin": PageLayout::default().origin,
            "fragments": [{
                "content": "Chapter 1",
                "bounding_box": {"left": 60.0, "top": 40.0, "width": 200.0, "height": 24.0}
            }]
        }]
    });
    example.to_string()
}
