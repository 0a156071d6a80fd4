//! Rewrites that turn a class into its unchecked-exception variant
//!
//! For every top-level type the passes run in this order:
//! 1. [`rename`] the type and the constructors carrying its old name
//! 2. for every method with a `throws` clause and a body, [`strip`] the
//!    clause and [`wrap`] the body
//! 3. for every constructor with a `throws` clause, strip and wrap it,
//!    refusing constructors that delegate and then run more statements

mod rename;
mod strip;
mod wrap;

use log::{debug, trace};

pub use rename::{generated_name, rename_type};
pub use strip::{NO_LONGER_THROWS, THROWS_TAG, strip_failure_clause};
pub use wrap::{CATCH_VARIABLE, CAUGHT_EXCEPTION, wrap_constructor, wrap_procedure};

use crate::{
    error::UnsupportedDelegatingConstructor,
    java_ast::{CompilationUnit, Member, TypeDeclaration},
};

pub const DEFAULT_PREFIX: &str = "Unchecked";
pub const DEFAULT_SUFFIX: &str = "";
pub const DEFAULT_UNCHECKED_EXCEPTION: &str = "RuntimeException";
pub const DEFAULT_MESSAGE: &str = "wrapped checked exception";

/// Settings that shape the generated wrapper class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    /// Prepended to the type name
    pub prefix: String,
    /// Appended to the type name
    pub suffix: String,
    /// Exception type thrown in place of the checked ones
    pub unchecked_exception: String,
    /// Message passed to the unchecked exception
    pub message: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_owned(),
            suffix: DEFAULT_SUFFIX.to_owned(),
            unchecked_exception: DEFAULT_UNCHECKED_EXCEPTION.to_owned(),
            message: DEFAULT_MESSAGE.to_owned(),
        }
    }
}

/// Apply every rewrite to each top-level type of the unit
pub fn enhance_compilation_unit(
    unit: &mut CompilationUnit,
    options: &TransformOptions,
) -> Result<(), UnsupportedDelegatingConstructor> {
    for decl in unit.types_mut() {
        enhance_type(decl, options)?;
    }
    Ok(())
}

/// Apply every rewrite to one type declaration
pub fn enhance_type(
    decl: &mut TypeDeclaration,
    options: &TransformOptions,
) -> Result<(), UnsupportedDelegatingConstructor> {
    let original_name = rename_type(decl, options);
    debug!("Renamed type {original_name} to {}", decl.name);

    for member in &mut decl.members {
        if let Member::Procedure(procedure) = member
            && !procedure.throws.is_empty()
            && !procedure.is_bodiless()
        {
            trace!("Converting method {}", procedure.name);
            strip_failure_clause(procedure);
            wrap_procedure(procedure, options);
        }
    }

    for member in &mut decl.members {
        if let Member::Constructor(constructor) = member
            && !constructor.throws.is_empty()
        {
            trace!("Converting constructor {}", constructor.name);
            strip_failure_clause(constructor);
            wrap_constructor(constructor, options)?;
        }
    }

    Ok(())
}
