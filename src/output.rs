//! Output formatting for search results and dictionary listings

use crate::dictionary::{DictionarySummary, Entry, ViewResult};
use crate::query::EntryFailure;
use serde::Serialize;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Join translation forms for display
pub fn join_forms(forms: &[String]) -> String {
    forms.join(", ")
}

/// Split a gloss text into display lines
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print ranked results, one block per entry
pub fn print_results(results: &[ViewResult], color: bool, detailed: bool) -> io::Result<()> {
    let mut out = stdout(color);
    write_results(&mut out, results, detailed)
}

pub fn write_results<W: WriteColor>(
    out: &mut W,
    results: &[ViewResult],
    detailed: bool,
) -> io::Result<()> {
    for r in results {
        write_headline(out, r)?;
        if detailed {
            write_details(out, &r.entry)?;
        }
    }
    Ok(())
}

/// `dictionary:form  translations`
fn write_headline<W: WriteColor>(out: &mut W, r: &ViewResult) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
    write!(out, "{}", r.dictionary_name)?;
    out.reset()?;
    write!(out, ":")?;

    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(out, "{}", r.form())?;
    out.reset()?;

    let translations: Vec<String> = r
        .entry
        .translations
        .iter()
        .filter(|t| !t.forms.is_empty())
        .map(|t| join_forms(&t.forms))
        .collect();
    if !translations.is_empty() {
        write!(out, "  {}", translations.join("; "))?;
    }

    writeln!(out)
}

fn write_details<W: WriteColor>(out: &mut W, entry: &Entry) -> io::Result<()> {
    for t in &entry.translations {
        write_label(out, &t.label)?;
        writeln!(out, "{}", join_forms(&t.forms))?;
    }

    if !entry.tags.is_empty() {
        write_label(out, "tags")?;
        writeln!(out, "{}", entry.tags.join(", "))?;
    }

    for g in &entry.glosses {
        write_label(out, &g.label)?;
        let mut lines = split_lines(&g.text).into_iter();
        writeln!(out, "{}", lines.next().unwrap_or(""))?;
        for line in lines {
            writeln!(out, "      {}", line)?;
        }
    }

    for v in &entry.variations {
        write_label(out, &v.label)?;
        writeln!(out, "{}", v.form)?;
    }

    for rel in &entry.relations {
        write_label(out, &rel.label)?;
        writeln!(out, "-> {}", rel.target.form)?;
    }

    Ok(())
}

fn write_label<W: WriteColor>(out: &mut W, label: &str) -> io::Result<()> {
    write!(out, "    ")?;
    if !label.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(out, "[{}]", label)?;
        out.reset()?;
        write!(out, " ")?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonResult<'a> {
    dictionary: &'a str,
    word: &'a Entry,
}

/// Print results as a JSON array of `{ dictionary, word }` objects,
/// with words in the OTM-JSON layout
pub fn print_json(results: &[ViewResult]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_json(&mut out, results)
}

pub fn write_json<W: Write>(out: &mut W, results: &[ViewResult]) -> io::Result<()> {
    let rows: Vec<JsonResult<'_>> = results
        .iter()
        .map(|r| JsonResult {
            dictionary: &r.dictionary_name,
            word: &r.entry,
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &rows)?;
    writeln!(out)
}

/// Print loaded dictionaries with entry counts
pub fn print_summaries(summaries: &[DictionarySummary], color: bool) -> io::Result<()> {
    let mut out = stdout(color);
    write_summaries(&mut out, summaries)
}

pub fn write_summaries<W: WriteColor>(
    out: &mut W,
    summaries: &[DictionarySummary],
) -> io::Result<()> {
    for s in summaries {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "{}", s.name)?;
        out.reset()?;
        write!(out, ":")?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{}", s.entries)?;
        out.reset()?;
        if !s.included {
            write!(out, " (excluded)")?;
        }
        writeln!(out)?;
    }

    match summaries.len() {
        0 => writeln!(out, "No dictionaries loaded."),
        n => writeln!(out, "{} dictionaries loaded.", n),
    }
}

/// Report entries skipped after raw-script errors on stderr
pub fn print_failures(failures: &[EntryFailure]) {
    for f in failures {
        eprintln!(
            "warning: {}: entry {} skipped: {}",
            f.dictionary_name, f.entry_id, f.message
        );
    }
}
