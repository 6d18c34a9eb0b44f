// ============================================================================
// Basic Usage Example
// ============================================================================

use exp_softplus_unit::prelude::*;
use std::sync::Arc;

fn main() -> Result<(), UnitError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Exp/Softplus Unit Example ===\n");

    // Reference hardware configuration
    let unit = create_from_config(UnitConfig::q4_12(), Arc::new(LoggingObserver))?;
    let format = unit.format();
    println!("Created unit: {} with {} segments\n", format, unit.table().len());

    println!("=== Coefficient Table ===");
    for (i, segment) in unit.table().segments().iter().enumerate() {
        println!("  [{:2}] a = {:5}  b = {:5}", i, segment.a, segment.b);
    }

    println!("\n=== Evaluations ===");
    for x in [-2.0, -1.0, -0.5, 0.0, 0.5, 1.0, 2.0, 4.0] {
        let input = format.to_fixed(x);
        let exp = unit.exp(input);
        let softplus = unit.softplus(input);
        println!(
            "  x = {:5.2}  exp = {:8.4} (ideal {:8.4}){}  softplus = {:7.4} (ideal {:7.4})",
            x,
            format.to_float(exp.value),
            x.exp(),
            if exp.saturated { " [sat]" } else { "" },
            format.to_float(softplus.value),
            x.exp().ln_1p(),
        );
    }

    println!("\n=== Pipeline Trace (x = 1.0) ===");
    let trace = unit.trace(format.to_fixed(1.0));
    println!("  full product : {}", trace.full_product);
    println!("  z            : {}", trace.z);
    println!("  u, v         : {}, {}", trace.integer_part, trace.fraction);
    println!("  segment      : {}", trace.segment);
    println!("  linear       : {}", trace.linear);
    println!("  result       : {}", trace.result.value);

    println!("\n=== Accuracy over [-1, 1] ===");
    let evaluator = unit.evaluator();
    for mode in [EvaluationMode::Exp, EvaluationMode::Softplus] {
        let function = evaluator.function(mode);
        let metrics =
            sweep_function_parallel(&function, Sweep::symmetric_unit(), DEFAULT_MODEL_TOLERANCE, 4);
        println!(
            "  {:8}  max error {:.5}  rmse {:.5}  mismatches {}/{}",
            mode.to_string(),
            metrics.max_abs_error,
            metrics.rmse,
            metrics.mismatches,
            metrics.samples,
        );
    }

    let table = table_metrics(
        unit.table(),
        format,
        Sweep::unit_interval(),
        DEFAULT_TABLE_TOLERANCE,
    );
    println!(
        "  table     max error {:.5}  rmse {:.5}  mismatches {}/{}",
        table.max_abs_error, table.rmse, table.mismatches, table.samples,
    );

    Ok(())
}
