mod log;

use itertools::join;
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::Editor;
use schemers::Interpreter;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
struct Opt {
    #[structopt(short = "d", long = "debug")]
    debug: bool,

    #[structopt(
        name = "FILE",
        parse(from_os_str),
        help = "scheme file to run before the repl starts"
    )]
    file: Option<PathBuf>,
}

const HISTFILE: &str = ".schemers_hist";

fn main() {
    let opt = Opt::from_args();
    if opt.debug {
        log::debug(format!("set options: {:?}", opt));
    }

    let interpreter = Interpreter::new();
    if let Some(file) = &opt.file {
        if let Err(why) = interpreter.run_file(file) {
            log::warn(why);
        }
    }

    let mut rl = Editor::<()>::new();
    if let Err(err) = rl.load_history(HISTFILE) {
        log::warn(format!("error opening history file: {}", err));
    }

    let prompt = format!("{}schemers λ{} ", "\x1b[1;94m", log::RESET);

    loop {
        let input = rl.readline(&prompt);

        match input {
            Ok(line) => {
                if line.len() > 0 {
                    if line.starts_with('>') && line.len() > 1 {
                        println!("{}", command(&interpreter, &line[1..]));
                    } else {
                        rl.add_history_entry(line.as_str());
                        match interpreter.run(line) {
                            Ok(results) => {
                                for result in results {
                                    if !result.is_void() {
                                        println!("{}", result);
                                    }
                                }
                            }
                            Err(err) => log::error(err),
                        }
                    }
                }
            }

            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }

            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }

            Err(err) => {
                log::error(err);
                break;
            }
        }
    }

    if let Err(err) = rl.save_history(HISTFILE) {
        log::warn(format!("error saving history file: {}", err));
    }
}

/// handle a `>`-prefixed repl command
fn command(interpreter: &Interpreter, cmd: &str) -> String {
    match cmd {
        "env" => join(
            interpreter.env.borrow().bindings.iter().map(|(name, _)| name),
            ", ",
        ),
        _ => "invalid command".to_owned(),
    }
}
