//! FILENAME: engine/src/formulas.rs
//! PURPOSE: Iterative evaluation of a formula table into a target table.
//! CONTEXT: Every non-blank text cell of the formula table is parsed once.
//! Each pass then re-evaluates the parsed formulas in row-major order and
//! writes results straight into the target, so a cell evaluated later in the
//! pass sees the values written earlier in it. Passes repeat until one
//! changes nothing, or fail with `FormulaDivergence` once the cap is hit.

use crate::cell::CellValue;
use crate::error::{TableError, TableResult};
use crate::evaluator::{EvalResult, Evaluator};
use crate::table::Table;
use parser::Expression;

/// A parsed formula and the cell it writes.
struct CompiledFormula {
    row: usize,
    col: usize,
    expr: Expression,
}

impl Table {
    /// Evaluates `formulas` into `self` until a fixed point is reached.
    ///
    /// `formulas` must have the same shape as `self`. Cells that are empty,
    /// blank or not text are not formulas and leave the target cell alone.
    /// Returns the number of passes run, including the final pass that
    /// changed nothing.
    ///
    /// All formulas are parsed before any cell is written. An evaluation
    /// error or divergence stops the run with the cells written so far kept.
    pub fn apply_formulas(&mut self, formulas: &Table) -> TableResult<usize> {
        if formulas.len() != self.len() || formulas.num_cols() != self.num_cols() {
            return Err(TableError::ShapeMismatch(format!(
                "formula table is {}x{}, target is {}x{}",
                formulas.len(),
                formulas.num_cols(),
                self.len(),
                self.num_cols()
            )));
        }

        let compiled = compile(formulas)?;
        if compiled.is_empty() {
            return Ok(0);
        }

        let max_passes = self.options.max_formula_passes.max(1);
        let key_pos = self.key_position();
        let touches_key = compiled.iter().any(|f| Some(f.col) == key_pos);

        let outcome = self.run_passes(&compiled, max_passes);
        if touches_key {
            self.rebuild_key_index();
        }
        outcome
    }

    fn run_passes(&mut self, compiled: &[CompiledFormula], max_passes: usize) -> TableResult<usize> {
        for pass in 1..=max_passes {
            let mut changed = 0usize;
            for formula in compiled {
                let value = self.evaluate_formula(formula)?;
                let cell = &mut self.rows[formula.row][formula.col];
                if *cell != value {
                    *cell = value;
                    changed += 1;
                }
            }
            log::debug!("formula pass {}: {} cell(s) changed", pass, changed);
            if changed == 0 {
                return Ok(pass);
            }
        }

        log::warn!(
            "formulas did not settle after {} passes; check for circular references",
            max_passes
        );
        Err(TableError::FormulaDivergence { passes: max_passes })
    }

    fn evaluate_formula(&self, formula: &CompiledFormula) -> TableResult<CellValue> {
        let evaluator = Evaluator::new(self, formula.row, formula.col);
        match evaluator.evaluate(&formula.expr) {
            EvalResult::Error(e) => Err(TableError::FormulaEval {
                row: formula.row,
                col: formula.col,
                message: e.to_string(),
            }),
            result => Ok(result.to_cell_value()),
        }
    }
}

fn compile(formulas: &Table) -> TableResult<Vec<CompiledFormula>> {
    let mut compiled = Vec::new();
    for (row, cells) in formulas.rows().iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let CellValue::Text(source) = cell else {
                continue;
            };
            if source.trim().is_empty() {
                continue;
            }
            let expr = parser::parse(source).map_err(|e| TableError::FormulaParse {
                row,
                col,
                message: format!("{} (offset {})", e.message, e.offset),
            })?;
            compiled.push(CompiledFormula { row, col, expr });
        }
    }
    Ok(compiled)
}
