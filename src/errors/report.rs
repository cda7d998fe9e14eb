// src/errors/report.rs
//! Rendering of miette diagnostics with the offending source attached.

use miette::{Diagnostic, MietteHandlerOpts, NamedSource, Report};

use crate::cli::ColorMode;

/// Install the global report handler for an explicit color choice.
/// `Auto` keeps miette's own terminal detection.
pub fn init_color(mode: ColorMode) {
    let force = match mode {
        ColorMode::Auto => return,
        ColorMode::Always => true,
        ColorMode::Never => false,
    };
    let _ = miette::set_hook(Box::new(move |_| {
        Box::new(MietteHandlerOpts::new().color(force).build())
    }));
}

/// Render a batch of diagnostics to stderr, each with the named source
/// attached so miette can show the offending lines.
pub fn render_diagnostics<D>(file: &str, source: &str, diagnostics: &[D])
where
    D: Diagnostic + Clone + Send + Sync + 'static,
{
    for diag in diagnostics {
        let report = Report::new(diag.clone())
            .with_source_code(NamedSource::new(file, source.to_string()));
        eprintln!("{report:?}");
    }
}
