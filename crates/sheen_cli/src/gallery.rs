//! `sheen gallery`: browse the built-in style variants

use anyhow::Result;
use clap::Args;
use sheen_gallery::{Gallery, Locale};
use std::io::Write;

#[derive(Args, Debug, Clone, Default)]
pub struct GalleryArgs {
    /// Label language (en, zh)
    #[arg(short, long, default_value = "en")]
    pub locale: String,

    /// Widget kind to show; `global` prints the application theme
    pub kind: Option<String>,

    /// Variant index within the kind; prints its style sheet
    pub index: Option<usize>,
}

pub fn run(args: &GalleryArgs, gallery: &Gallery, out: &mut impl Write) -> Result<()> {
    let locale = Locale::parse(&args.locale);

    let Some(key) = args.kind.as_deref() else {
        writeln!(out, "{:<12} {}", "global", gallery.global.label.get(locale))?;
        for kind in gallery.kinds() {
            writeln!(
                out,
                "{:<12} {} ({} variants)",
                kind.key,
                kind.label(locale),
                kind.variants.len()
            )?;
        }
        return Ok(());
    };

    if key == "global" {
        write!(out, "{}", gallery.global_css())?;
        return Ok(());
    }

    let kind = gallery.kind(key)?;
    match args.index {
        None => {
            writeln!(out, "{} ({})", kind.label(locale), kind.widget)?;
            for (index, variant) in kind.variants.iter().enumerate() {
                writeln!(out, "{:>3}  {:<14} {}", index, variant.key, variant.label(locale))?;
                if let Some(note) = variant.note(locale) {
                    writeln!(out, "{:>5}{}", "", note)?;
                }
            }
        }
        Some(index) => {
            let variant = kind.variant(index)?;
            writeln!(
                out,
                "/* {} / {} */",
                kind.label(locale),
                variant.label(locale)
            )?;
            write!(out, "{}", variant.css)?;
        }
    }
    Ok(())
}
