//! `sheen resolve`: compute the style of one widget against a sheet

use anyhow::{Context, Result};
use clap::Args;
use sheen_core::{PseudoState, WidgetId, WidgetSpec};
use sheen_style::{EngineConfig, PropertyMap, RecordingSink, Scope, StyleEngine};
use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

use crate::check::write_diagnostic;

#[derive(Args, Debug, Clone, Default)]
pub struct ResolveArgs {
    /// Style sheet file, registered as the application-wide sheet
    pub file: PathBuf,

    /// Widget type name
    #[arg(short = 't', long = "type")]
    pub type_name: String,

    /// Object id
    #[arg(long)]
    pub id: Option<String>,

    /// Active pseudo-state (repeatable)
    #[arg(short, long = "state")]
    pub states: Vec<String>,

    /// Attribute as name=value (repeatable)
    #[arg(short, long = "attr")]
    pub attrs: Vec<String>,

    /// Resolve a subcontrol instead of the widget body
    #[arg(short, long)]
    pub part: Option<String>,

    /// Ancestor as Type or Type#id, outermost first (repeatable)
    #[arg(long = "parent")]
    pub parents: Vec<String>,

    /// Also list the matching rules, highest priority first
    #[arg(long)]
    pub rules: bool,

    /// Print the computed map as JSON
    #[arg(long)]
    pub json: bool,
}

/// `Type` or `Type#id`
fn parse_ancestor(text: &str) -> Result<WidgetSpec> {
    let (type_name, id) = match text.split_once('#') {
        Some((type_name, id)) => (type_name, Some(id)),
        None => (text, None),
    };
    if type_name.is_empty() || id.is_some_and(str::is_empty) {
        anyhow::bail!("Invalid ancestor `{}`, expected Type or Type#id", text);
    }
    let spec = WidgetSpec::new(type_name);
    Ok(match id {
        Some(id) => spec.id(id),
        None => spec,
    })
}

fn parse_attribute(text: &str) -> Result<(String, String)> {
    let (name, value) = text
        .split_once('=')
        .with_context(|| format!("Invalid attribute `{}`, expected name=value", text))?;
    let value = value.trim_matches('"');
    Ok((name.trim().to_string(), value.to_string()))
}

impl ResolveArgs {
    fn target_spec(&self, parent: Option<WidgetId>) -> Result<WidgetSpec> {
        let mut spec = WidgetSpec::new(&self.type_name);
        if let Some(id) = &self.id {
            spec = spec.id(id);
        }
        if let Some(parent) = parent {
            spec = spec.parent(parent);
        }
        for attr in &self.attrs {
            let (name, value) = parse_attribute(attr)?;
            spec = spec.attr(name, value);
        }
        for state in &self.states {
            spec = spec.state(PseudoState::parse(state));
        }
        Ok(spec)
    }

    /// Selector-like description of the target
    fn describe(&self) -> String {
        let mut text = self.type_name.clone();
        if let Some(id) = &self.id {
            let _ = write!(text, "#{}", id);
        }
        for attr in &self.attrs {
            if let Ok((name, value)) = parse_attribute(attr) {
                let _ = write!(text, "[{}=\"{}\"]", name, value);
            }
        }
        for state in &self.states {
            let _ = write!(text, ":{}", PseudoState::parse(state).name());
        }
        if let Some(part) = &self.part {
            let _ = write!(text, "::{}", part);
        }
        text
    }
}

fn write_map(out: &mut impl Write, header: &str, map: &PropertyMap) -> Result<()> {
    writeln!(out, "{} {{", header)?;
    for (property, value) in map.iter() {
        writeln!(out, "    {}: {};", property.name(), value)?;
    }
    writeln!(out, "}}")?;
    Ok(())
}

fn write_json(out: &mut impl Write, map: &PropertyMap) -> Result<()> {
    let object: serde_json::Map<String, serde_json::Value> = map
        .iter()
        .map(|(property, value)| {
            (
                property.name().to_string(),
                serde_json::Value::String(value.to_string()),
            )
        })
        .collect();
    let text = serde_json::to_string_pretty(&object).context("Failed to serialize styles")?;
    writeln!(out, "{}", text)?;
    Ok(())
}

/// Resolve `args` against `css`. Diagnostics go to `diag`, the result to `out`.
pub fn run(
    args: &ResolveArgs,
    css: &str,
    config: &EngineConfig,
    out: &mut impl Write,
    diag: &mut impl Write,
) -> Result<PropertyMap> {
    let mut engine = StyleEngine::new(config.clone(), RecordingSink::new());
    let name = args.file.display().to_string();
    for err in engine.set_stylesheet(Scope::Global, css)? {
        write_diagnostic(diag, &name, &err)?;
    }

    let mut parent = None;
    for ancestor in &args.parents {
        let mut spec = parse_ancestor(ancestor)?;
        if let Some(parent) = parent {
            spec = spec.parent(parent);
        }
        parent = Some(engine.create_widget(spec)?);
    }
    let node = engine.create_widget(args.target_spec(parent)?)?;

    let part = args.part.as_deref();
    let map = match part {
        Some(part) => engine.resolve_part(node, part)?,
        None => engine.resolve(node)?,
    };

    if args.rules {
        for matched in engine.matching_rules(node, part)? {
            writeln!(
                out,
                "/* {} {} #{} */ {}",
                matched.rule.scope,
                matched.priority.specificity,
                matched.priority.order,
                matched.rule.rule.selector()
            )?;
        }
    }

    if args.json {
        write_json(out, &map)?;
    } else {
        write_map(out, &args.describe(), &map)?;
    }
    Ok(map)
}
