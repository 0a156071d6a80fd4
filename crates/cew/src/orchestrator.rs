//! Per-unit pipeline: read -> parse -> rewrite -> generate -> write
//!
//! Each unit is transformed independently and owns its tree for the whole
//! run, so batches are spread over the rayon pool. Nothing is written for a
//! unit until its transformation has fully succeeded.

use log::{debug, info};
use rayon::prelude::*;

use crate::{
    code_generator::generate,
    error::{Result, TransformError},
    parser::parse,
    sink::TextSink,
    source::TextSource,
    transformations::{TransformOptions, enhance_compilation_unit, generated_name},
    types::UnitId,
};

/// Result of transforming one unit of a batch
#[derive(Debug)]
pub struct UnitOutcome {
    pub unit: UnitId,
    /// The output identifier on success
    pub result: Result<UnitId>,
}

/// Drives unit transformations against a source and a sink
#[derive(Debug, Clone, Copy)]
pub struct Orchestrator<'a> {
    source: &'a dyn TextSource,
    sink: &'a dyn TextSink,
    options: &'a TransformOptions,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        source: &'a dyn TextSource,
        sink: &'a dyn TextSink,
        options: &'a TransformOptions,
    ) -> Self {
        Self {
            source,
            sink,
            options,
        }
    }

    /// Identifier of the generated unit: same package, renamed class
    pub fn output_id(&self, unit: &UnitId) -> UnitId {
        unit.with_simple_name(&generated_name(unit.simple_name(), self.options))
    }

    /// Transform one unit and write the result, returning the output identifier
    pub fn transform(&self, unit: &UnitId) -> Result<UnitId> {
        let text = self
            .source
            .read(unit)
            .map_err(|err| TransformError::SourceRead {
                unit: unit.to_string(),
                location: err.location,
                source: err.source,
            })?
            .ok_or_else(|| TransformError::SourceNotFound {
                unit: unit.to_string(),
            })?;

        let generated = rewrite_source(unit, &text, self.options)?;

        let output = self.output_id(unit);
        self.sink
            .write(&output, &generated)
            .map_err(|err| TransformError::Write {
                unit: unit.to_string(),
                path: err.path,
                source: err.source,
            })?;

        info!("Created {}", output.file_name());
        Ok(output)
    }

    /// Transform every unit, collecting each outcome in input order
    pub fn transform_all(&self, units: &[UnitId]) -> Vec<UnitOutcome> {
        debug!("Transforming {} units", units.len());
        units
            .par_iter()
            .map(|unit| UnitOutcome {
                unit: unit.clone(),
                result: self.transform(unit),
            })
            .collect()
    }

    /// Transform every unit, stopping at the first error
    pub fn transform_all_fail_fast(&self, units: &[UnitId]) -> Result<Vec<UnitId>> {
        debug!("Transforming {} units (fail fast)", units.len());
        units.par_iter().map(|unit| self.transform(unit)).collect()
    }
}

/// Parse, rewrite and regenerate one unit's source text
pub fn rewrite_source(unit: &UnitId, text: &str, options: &TransformOptions) -> Result<String> {
    let mut tree = parse(text).map_err(|source| TransformError::Syntax {
        unit: unit.to_string(),
        source,
    })?;

    enhance_compilation_unit(&mut tree, options).map_err(|source| {
        TransformError::UnsupportedDelegatingConstructor {
            unit: unit.to_string(),
            source,
        }
    })?;

    Ok(generate(&tree))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_id() {
        #[derive(Debug)]
        struct Nothing;
        impl TextSource for Nothing {
            fn read(
                &self,
                _unit: &UnitId,
            ) -> std::result::Result<Option<String>, crate::source::SourceReadError> {
                Ok(None)
            }
        }
        impl TextSink for Nothing {
            fn write(
                &self,
                _output: &UnitId,
                _text: &str,
            ) -> std::result::Result<(), crate::sink::WriteError> {
                Ok(())
            }
        }

        let options = TransformOptions {
            suffix: "Wrapper".to_owned(),
            ..TransformOptions::default()
        };
        let orchestrator = Orchestrator::new(&Nothing, &Nothing, &options);
        assert_eq!(
            orchestrator.output_id(&UnitId::new("java/io/Reader")),
            UnitId::new("java/io/UncheckedReaderWrapper")
        );

        let err = orchestrator
            .transform(&UnitId::new("java/io/Reader"))
            .unwrap_err();
        assert!(matches!(err, TransformError::SourceNotFound { .. }));
        assert_eq!(err.unit(), "java/io/Reader");
    }

    #[test]
    fn test_rewrite_source_reports_unit_on_syntax_error() {
        let err = rewrite_source(
            &UnitId::new("a/Broken"),
            "class Broken {",
            &TransformOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::Syntax { .. }));
        assert_eq!(err.unit(), "a/Broken");
    }
}
