use devcon::console::Console;
use devcon::derive::*;
use std::io::{self, BufRead, Write};

#[derive(Debug, Compound)]
#[devcon(validate = Colour::in_range)]
struct Colour {
    r: f32,
    g: f32,
    b: f32,
    #[devcon(default = 1.0)]
    a: f32,
}

impl Colour {
    fn in_range(&self) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .all(|channel| (0.0..=1.0).contains(channel))
    }
}

#[derive(Debug, Command)]
struct Sum {
    #[devcon(min = 1, description = "The values to sum.")]
    items: Vec<i64>,
    #[devcon(short = 'v', description = "Show the items as well.")]
    verbose: bool,
}

#[derive(Debug, Command)]
struct Paint {
    #[devcon(description = "The colour, as [r g b] or [r g b a].")]
    colour: Colour,
    #[devcon(short = 'n', long = "layer name", meta = "NAME", default_raw = "base")]
    layer: String,
}

fn main() {
    let mut console = Console::new();
    console
        .register_command("sum", "Add up some numbers.", |sum: Sum| {
            let total: i64 = sum.items.iter().sum();

            if sum.verbose {
                format!("{:?} = {total}", sum.items)
            } else {
                total.to_string()
            }
        })
        .expect("Invalid 'sum' command");
    console
        .register_command("paint", "Paint the layer.", |paint: Paint| {
            format!("Painted '{}' with {:?}.", paint.layer, paint.colour)
        })
        .expect("Invalid 'paint' command");
    console
        .register_raw("echo", "Print the text as is.", |text| text.to_string())
        .expect("Invalid 'echo' command");

    let stdin = io::stdin();
    print!("> ");
    let _ = io::stdout().flush();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };

        match console.execute(&line) {
            Ok(output) if output.is_empty() => {}
            Ok(output) => println!("{output}"),
            Err(error) => {
                if let Some(context) = error.context(&line) {
                    println!("{context}");
                }
                println!("{error}");
            }
        }

        print!("> ");
        let _ = io::stdout().flush();
    }
}
