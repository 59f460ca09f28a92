use exprcalc::{Engine, EngineConfig};

fn main() {
    pretty_env_logger::init();

    let engine = Engine::with_config(EngineConfig {
        install_extras: true,
        ..Default::default()
    });

    let expressions = vec![
        "250 * 14.3",
        "3^6 / 117",
        "(2.16 - 48.34)^-1",
        "max(1, sum(2, 3), abs(-4))",
        "1 / 0",
        "log(2, 1024)",
    ];

    let results = engine.evaluate_batch(&expressions);
    for (expression, result) in expressions.iter().zip(results) {
        match result {
            Ok(value) => println!("{:<28} = {}", expression, value),
            Err(err) => println!("{:<28} ! {}", expression, err),
        }
    }
}
