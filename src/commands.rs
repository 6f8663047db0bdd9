use crate::{emit_success, OutputMode, Settings};
use owo_colors::OwoColorize;
use std::path::Path;
use xsdgraph::element::Variant;
use xsdgraph::graph::SchemaForest;
use xsdgraph::loader::Loader;
use xsdgraph::ui::{self, theme, Icons};
use xsdgraph::{DefinitionKind, ElementId, Error, Occurs, Parser, ResolvedSchemaGraph};

/// Load the closure of `file`, merge it and resolve every reference
fn build(file: &Path, settings: &Settings) -> xsdgraph::Result<(ResolvedSchemaGraph, Vec<Error>)> {
    let loader = Loader::new(Parser::new(settings.options.clone())).with_follow_imports(settings.follow_imports);
    loader.load(file)?.resolve()
}

pub fn run_check(file: &Path, settings: &Settings, output_mode: OutputMode) -> anyhow::Result<bool> {
    // A malformed schema is a failed check, not a tool failure
    let (graph, errors) = match build(file, settings) {
        Ok(built) => built,
        Err(err) if err.is_structural() => {
            if output_mode.is_human() {
                ui::header(&format!("Checking {}", file.display()));
                ui::error(&err.to_string());
            } else {
                let data = serde_json::json!({
                    "file": file.display().to_string(),
                    "errors": [err.to_string()],
                });
                emit_success("check", data)?;
            }
            return Ok(false);
        }
        Err(err) => return Err(err.into()),
    };
    let forest = graph.forest();
    let stats = graph.stats();

    if output_mode.is_human() {
        ui::header(&format!("Checking {}", file.display()));
        ui::status(Icons::FILE, "Documents", &forest.documents().len().to_string());
        ui::status(Icons::LINK, "References", &stats.total.to_string());
        for err in &errors {
            ui::error(&err.to_string());
        }
        if errors.is_empty() {
            ui::success("All references resolved");
        } else {
            ui::warn(&format!("{} unresolved references", errors.len()));
        }
    } else {
        let data = serde_json::json!({
            "file": file.display().to_string(),
            "documents": forest.documents(),
            "resolution": stats,
            "errors": errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        });
        emit_success("check", data)?;
    }
    Ok(errors.is_empty())
}

pub fn run_stats(file: &Path, settings: &Settings, output_mode: OutputMode) -> anyhow::Result<bool> {
    let (graph, errors) = build(file, settings)?;
    let forest = graph.forest();
    let stats = forest.stats();
    let definitions: Vec<(DefinitionKind, usize)> = DefinitionKind::all()
        .iter()
        .map(|kind| (*kind, forest.globals(*kind).len()))
        .filter(|(_, count)| *count > 0)
        .collect();

    if output_mode.is_human() {
        ui::header(&format!("{} Schema statistics ({})", Icons::STATS, file.display()));
        let mut rows = vec![
            ("Documents", stats.documents.to_string()),
            ("Elements", stats.elements.to_string()),
            ("Global definitions", stats.definitions.to_string()),
            ("References", stats.references.to_string()),
            ("Resolved", stats.resolved_references.to_string()),
            ("Unresolved", errors.len().to_string()),
        ];
        let labels: Vec<String> = definitions.iter().map(|(kind, _)| format!("  {}", kind)).collect();
        for ((_, count), label) in definitions.iter().zip(&labels) {
            rows.push((label.as_str(), count.to_string()));
        }
        println!("{}", ui::stats_table(&rows));
    } else {
        let per_kind: serde_json::Map<String, serde_json::Value> = definitions
            .iter()
            .map(|(kind, count)| (kind.to_string(), serde_json::json!(count)))
            .collect();
        let data = serde_json::json!({
            "graph": stats,
            "resolution": graph.stats(),
            "definitions": per_kind,
        });
        emit_success("stats", data)?;
    }
    Ok(true)
}

pub fn run_deps(
    file: &Path,
    settings: &Settings,
    output_mode: OutputMode,
    unresolved_only: bool,
) -> anyhow::Result<bool> {
    let (graph, _) = build(file, settings)?;
    let forest = graph.forest();
    let documents = forest.pending_documents();
    let references: Vec<_> = forest
        .dependencies()
        .into_iter()
        .filter(|dependency| !unresolved_only || !dependency.resolved)
        .collect();

    if output_mode.is_human() {
        ui::section("Documents");
        for pending in documents {
            let location = pending.reference.schema_location.as_deref().unwrap_or("-");
            let from = forest.document_name(pending.document).unwrap_or("?");
            println!(
                "  {} {} {}",
                pending.reference.kind.style(theme().kind.clone()),
                location,
                ui::muted(&format!("(from {})", from))
            );
        }

        ui::section("References");
        for dependency in &references {
            let icon = if dependency.resolved { Icons::CHECK } else { Icons::CROSS };
            println!(
                "  {} {}={} {} {}",
                icon,
                dependency.attribute,
                dependency.name.style(theme().name.clone()),
                ui::dim(&format!("[{}]", dependency.kind)),
                ui::muted(&dependency.location)
            );
        }
    } else {
        let data = serde_json::json!({
            "documents": documents,
            "references": references,
        });
        emit_success("deps", data)?;
    }
    Ok(true)
}

pub fn run_tree(
    file: &Path,
    settings: &Settings,
    output_mode: OutputMode,
    max_depth: Option<usize>,
) -> anyhow::Result<bool> {
    let (graph, _) = build(file, settings)?;
    let forest = graph.forest();

    if output_mode.is_human() {
        ui::header(&format!("{} {}", Icons::TREE, file.display()));
        for root in forest.roots() {
            if let Some(name) = forest.get(*root).and_then(|e| forest.document_name(e.document)) {
                println!("{}", ui::muted(name));
            }
            print_tree(forest, *root, 0, max_depth);
        }
    } else {
        let elements: Vec<_> = forest.iter().collect();
        emit_success("tree", serde_json::json!({ "elements": elements }))?;
    }
    Ok(true)
}

fn print_tree(forest: &SchemaForest, id: ElementId, depth: usize, max_depth: Option<usize>) {
    let Some(element) = forest.get(id) else {
        return;
    };

    let local = match &element.variant {
        Variant::Facet(facet) => facet.facet.clone(),
        _ => element.kind.to_string(),
    };
    let mut line = format!("{}{}", "  ".repeat(depth), local.style(theme().kind.clone()));
    if let Some(name) = element.name() {
        line.push_str(&format!(" {}", name.style(theme().name.clone())));
    }
    if let Some(occurs) = element.occurs().filter(|o| *o != Occurs::default()) {
        line.push_str(&format!(" {}", ui::dim(&occurs.to_string())));
    }
    for link in &element.links {
        let icon = if link.reference.is_resolved() { Icons::LINK } else { Icons::CROSS };
        line.push_str(&format!(" {} {}={}", icon, link.attribute, link.reference.name()));
    }
    println!("{}", line);

    if max_depth.is_some_and(|max| depth >= max) {
        return;
    }
    for child in forest.children(id) {
        print_tree(forest, *child, depth + 1, max_depth);
    }
}
