//! Extraction dispatch and the repair-and-retry protocol.

use crate::ast::AstExtractor;
use crate::generic;
use crate::language::Language;
use crate::python;
use crate::types::Extraction;
use semindex_repair::{repair_syntax, FileFix, SourceFile};

/// Extract symbols from one file.
///
/// Total: always produces a symbol list, possibly impoverished, never an
/// error. AST languages get one repair-and-retry round on parse failure
/// before degrading to generic extraction.
pub fn extract(file: &SourceFile) -> Extraction {
    let language = Language::from_path(&file.path);
    if language.supports_ast() {
        return extract_with_repair(file, language);
    }
    match language {
        Language::Python => Extraction::clean(python::extract(&file.content, &file.path)),
        _ => Extraction::clean(generic::extract(&file.content, &file.path)),
    }
}

fn extract_with_repair(file: &SourceFile, language: Language) -> Extraction {
    let mut extractor = match AstExtractor::new(language) {
        Ok(extractor) => extractor,
        Err(err) => {
            log::warn!(
                "{}: AST extractor unavailable ({err}), using generic extraction",
                file.path
            );
            return Extraction::clean(generic::extract(&file.content, &file.path));
        }
    };

    match extractor.extract(&file.content, &file.path) {
        Ok(symbols) => Extraction::clean(symbols),
        Err(parse_err) => {
            log::warn!("{}: {parse_err}, running syntax repair", file.path);
            let outcome = repair_syntax(&file.content, &file.path);
            let fix = outcome
                .fixed
                .then(|| FileFix::from_outcome(&file.path, &file.content, &outcome));

            match extractor.extract(&outcome.content, &file.path) {
                Ok(symbols) => {
                    log::info!("{}: parse succeeded after syntax repair", file.path);
                    Extraction { symbols, fix }
                }
                Err(retry_err) => {
                    log::warn!(
                        "{}: {retry_err} after repair, degrading to generic extraction",
                        file.path
                    );
                    Extraction {
                        symbols: generic::extract(&outcome.content, &file.path),
                        fix,
                    }
                }
            }
        }
    }
}
