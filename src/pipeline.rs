//! Ordered pass runner.
//!
//! A [`Pipeline`] walks the document once per pass. Resolvers only see the
//! numbers registered by passes that ran before them, so the order is part
//! of the contract; [`Pipeline::push`] enforces it through each pass's
//! `provides`/`requires` declarations.

use texdocx_ast::{walk, Pandoc};
use tracing::debug;

use crate::config::FilterOptions;
use crate::context::FilterContext;
use crate::passes::{
    AdjustImages, ExtractTheorems, IndentParagraphs, NumberEquations, NumberFigures,
    NumberHeaders, NumberTables, Pass, ReferencesHeading, RegistryId,
    ResolveEquationReferences, ResolveReferences,
};
use crate::registry::Registries;
use crate::utils::error::{FilterError, FilterResult, FilterWarning};
use crate::utils::report::FilterReport;

#[derive(Default)]
pub struct Pipeline {
    passes: Vec<Box<dyn Pass>>,
    provided: Vec<RegistryId>,
}

impl Pipeline {
    /// An empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// The full filter, passes in their fixed order.
    pub fn standard() -> Self {
        let passes: Vec<Box<dyn Pass>> = vec![
            Box::new(NumberHeaders),
            Box::new(ReferencesHeading),
            Box::new(AdjustImages),
            Box::new(NumberFigures),
            Box::new(NumberTables),
            Box::new(ExtractTheorems),
            Box::new(ResolveReferences),
            Box::new(NumberEquations),
            Box::new(ResolveEquationReferences),
            Box::new(IndentParagraphs),
        ];
        let provided = passes
            .iter()
            .flat_map(|pass| pass.provides().iter().copied())
            .collect();
        Self { passes, provided }
    }

    /// Append a pass, rejecting it if it reads a registry nothing before it fills.
    pub fn push<P: Pass + 'static>(&mut self, pass: P) -> FilterResult<&mut Self> {
        if let Some(missing) = first_unfilled(&pass, &self.provided) {
            return Err(FilterError::pass_order(pass.name(), missing.as_str()));
        }
        self.provided.extend_from_slice(pass.provides());
        self.passes.push(Box::new(pass));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Run every pass over `doc`, one traversal each.
    pub fn run(&mut self, doc: &mut Pandoc, cx: &mut FilterContext) {
        for pass in self.passes.iter_mut() {
            debug!(pass = pass.name(), "running pass");
            walk(doc, pass.as_mut(), cx);
        }
    }
}

fn first_unfilled(pass: &dyn Pass, provided: &[RegistryId]) -> Option<RegistryId> {
    pass.requires()
        .iter()
        .copied()
        .find(|registry| !provided.contains(registry))
}

/// Filtered document plus everything learned while filtering it
#[derive(Debug, Clone)]
pub struct FilterOutput {
    pub document: Pandoc,
    pub warnings: Vec<FilterWarning>,
    pub registries: Registries,
    pub options: FilterOptions,
}

impl FilterOutput {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Serialize the document back to Pandoc JSON.
    pub fn to_json(&self) -> FilterResult<String> {
        Ok(self.document.to_json()?)
    }

    pub fn report(&self) -> FilterReport {
        FilterReport::new(self.options.target, &self.registries, self.warnings.clone())
    }
}

/// Run the standard pipeline over a parsed document.
pub fn apply_filters(mut document: Pandoc, options: FilterOptions) -> FilterOutput {
    let mut cx = FilterContext::new(options);
    Pipeline::standard().run(&mut document, &mut cx);

    let FilterContext {
        options,
        registries,
        warnings,
        ..
    } = cx;
    debug!(
        headers = registries.headers.len(),
        figures = registries.figures.len(),
        tables = registries.tables.len(),
        theorems = registries.theorems.len(),
        equations = registries.equations.len(),
        warnings = warnings.len(),
        "filter finished"
    );
    FilterOutput {
        document,
        warnings,
        registries,
        options,
    }
}

/// Parse Pandoc JSON, check its API version and run the standard pipeline.
pub fn filter_json(input: &str, options: FilterOptions) -> FilterResult<FilterOutput> {
    let document = Pandoc::from_json(input)?;
    document.check_api_version()?;
    Ok(apply_filters(document, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_order() {
        assert_eq!(
            Pipeline::standard().pass_names(),
            vec![
                "header-numbering",
                "reference-heading-injection",
                "image-adjustment",
                "figure-numbering",
                "table-numbering",
                "theorem-extraction",
                "general-ref-resolution",
                "equation-numbering",
                "equation-ref-resolution",
                "paragraph-indentation",
            ]
        );
    }

    #[test]
    fn test_standard_order_satisfies_contract() {
        let mut pipeline = Pipeline::new();
        let result = (|| -> FilterResult<()> {
            pipeline
                .push(NumberHeaders)?
                .push(ReferencesHeading)?
                .push(AdjustImages)?
                .push(NumberFigures)?
                .push(NumberTables)?
                .push(ExtractTheorems)?
                .push(ResolveReferences)?
                .push(NumberEquations)?
                .push(ResolveEquationReferences)?
                .push(IndentParagraphs)?;
            Ok(())
        })();
        assert!(result.is_ok());
        assert_eq!(pipeline.pass_names(), Pipeline::standard().pass_names());
    }

    #[test]
    fn test_resolver_before_numbering_is_rejected() {
        let mut pipeline = Pipeline::new();
        let err = pipeline.push(ResolveEquationReferences).err().unwrap();
        match err {
            FilterError::PassOrder { pass, missing } => {
                assert_eq!(pass, "equation-ref-resolution");
                assert_eq!(missing, "equation");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_partial_registries_rejected() {
        let mut pipeline = Pipeline::new();
        pipeline.push(NumberHeaders).unwrap().push(NumberFigures).unwrap();
        let err = pipeline.push(ResolveReferences).err().unwrap();
        assert!(err.to_string().contains("table registry"));
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn test_filter_json_rejects_old_pandoc() {
        let input = r#"{"pandoc-api-version":[1,22,2],"meta":{},"blocks":[]}"#;
        let err = filter_json(input, FilterOptions::default()).unwrap_err();
        assert!(matches!(err, FilterError::UnsupportedApiVersion { .. }));
    }

    #[test]
    fn test_filter_json_rejects_garbage() {
        let err = filter_json("not json", FilterOptions::default()).unwrap_err();
        assert!(matches!(err, FilterError::Json { .. }));
    }
}
