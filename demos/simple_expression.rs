use exprcalc::{format_number, Engine};
use log::debug;

fn main() {
    pretty_env_logger::init();

    let engine = Engine::new();

    let expression = std::env::args()
        .skip(1)
        .collect::<Vec<String>>()
        .join(" ");
    let expression = if expression.is_empty() {
        "3 + 4 * 2 / ( 1 - 5 ) ^ 2 ^ 3".to_string()
    } else {
        expression
    };

    match engine.to_postfix(&expression) {
        Ok(postfix) => debug!("postfix: {postfix}"),
        Err(err) => {
            println!("Error: {}", err);
            return;
        }
    }

    match engine.evaluate(&expression) {
        Ok(result) => println!("{} = {}", expression, format_number(result, 5)),
        Err(err) => println!("Error: {}", err),
    }
}
