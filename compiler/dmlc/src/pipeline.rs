//! Compile entry points.

use std::sync::Arc;

use dml_diagnostic::{Observation, ObservationSink};
use dml_ir::SyntaxTree;
use dml_sema::{merge_namespaces, validate, SymbolTable};
use dml_symbols::{build_compilation, Compilation};
use rayon::prelude::*;

use crate::parser::parse_input;
use crate::{CompileFailure, CompileOptions, SourceInput, SourceParser};

/// Parse every input with `parser`, then compile the trees.
///
/// Parse errors from every unit are collected and returned without running
/// any later phase.
#[tracing::instrument(level = "debug", skip_all, fields(inputs = inputs.len()))]
pub fn compile<P: SourceParser + ?Sized>(
    inputs: &[SourceInput],
    parser: &P,
    options: &CompileOptions,
) -> Result<Compilation, CompileFailure> {
    let mut trees = Vec::with_capacity(inputs.len());
    let mut parse_errors: Vec<Observation> = Vec::new();
    for input in inputs {
        match parse_input(parser, input) {
            Ok(tree) => trees.push(tree),
            Err(errors) => parse_errors.extend(errors.into_iter().map(Observation::from)),
        }
    }

    if !parse_errors.is_empty() {
        tracing::debug!(errors = parse_errors.len(), "parse failed");
        let mut sink = ObservationSink::new();
        sink.extend(parse_errors);
        return Err(CompileFailure::new(sink.into_limited(options.observation_limit)));
    }

    compile_trees(&trees, options)
}

/// Merge, check and build already-parsed trees.
#[tracing::instrument(level = "debug", skip_all, fields(trees = trees.len()))]
pub fn compile_trees(
    trees: &[SyntaxTree],
    options: &CompileOptions,
) -> Result<Compilation, CompileFailure> {
    let groups = merge_namespaces(trees);

    let mut sink = ObservationSink::new();
    let table = SymbolTable::from_groups(&groups, Arc::clone(&options.universe), &mut sink);
    validate(&groups, &table, &options.validation(), &mut sink);

    if !sink.is_empty() {
        tracing::debug!(observations = sink.len(), "compile failed");
        return Err(CompileFailure::new(sink.into_limited(options.observation_limit)));
    }

    let compilation = build_compilation(&groups, Arc::new(table));
    tracing::debug!(symbols = compilation.len(), "compile complete");
    Ok(compilation)
}

/// Compile independent input sets, in parallel when there is more than one.
///
/// Each set gets its own symbol table, builder and graph; results are in
/// the order of `batches`.
#[tracing::instrument(level = "debug", skip_all, fields(batches = batches.len()))]
pub fn compile_batch<P: SourceParser + ?Sized>(
    batches: &[Vec<SourceInput>],
    parser: &P,
    options: &CompileOptions,
) -> Vec<Result<Compilation, CompileFailure>> {
    if batches.len() <= 1 {
        batches
            .iter()
            .map(|inputs| compile(inputs, parser, options))
            .collect()
    } else {
        batches
            .par_iter()
            .map(|inputs| compile(inputs, parser, options))
            .collect()
    }
}
