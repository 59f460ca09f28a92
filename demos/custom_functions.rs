use exprcalc::{expr_fn, Arity, DuplicatePolicy, Engine, EngineConfig};

#[expr_fn]
fn hypot(a: f64, b: f64) -> f64 {
    a.hypot(b)
}

#[expr_fn]
fn mean(args: &[f64]) -> f64 {
    args.iter().sum::<f64>() / args.len() as f64
}

fn main() {
    pretty_env_logger::init();

    let mut engine = Engine::with_config(EngineConfig {
        duplicate_policy: DuplicatePolicy::Overwrite,
        ..Default::default()
    });

    engine.add_function("hypot", HYPOT_ARITY, hypot).unwrap();
    engine.add_function("mean", MEAN_ARITY, mean).unwrap();
    engine
        .add_function("cube", Arity::Fixed(1), |args| args[0].powi(3))
        .unwrap();

    // overwriting logs a warning instead of failing with this policy
    engine
        .add_function("cube", Arity::Fixed(1), |args| args[0] * args[0] * args[0])
        .unwrap();

    for expression in ["hypot(3, 4)", "2mean(1, 2, 3, 4)", "cube(3) - sqrt(9)"] {
        match engine.evaluate(expression) {
            Ok(result) => println!("{} = {}", expression, result),
            Err(err) => println!("{}: {}", expression, err),
        }
    }

    engine.remove_function("cube").unwrap();
    if let Err(err) = engine.evaluate("cube(2)") {
        println!("after removing cube: {}", err);
    }
}
