use std::fmt;
use std::process::exit;

use std::io::{self, stdout, BufRead, Write};

use clap::{App, Arg};
use liner::{BasicCompleter, Context, Prompt};

use recalc::{eval, CalcError};

const PROMPT: &str = "[]> ";

pub enum RuntimeError {
    Calc(CalcError),
    IO(io::Error),
}

impl From<CalcError> for RuntimeError {
    fn from(data: CalcError) -> RuntimeError {
        RuntimeError::Calc(data)
    }
}

impl From<io::Error> for RuntimeError {
    fn from(data: io::Error) -> RuntimeError {
        RuntimeError::IO(data)
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RuntimeError::Calc(ref c) => {
                write!(f, "recalc: {} ({})", c, c.code())
            }
            RuntimeError::IO(ref e) => write!(f, "recalc: {}", e),
        }
    }
}

pub fn calc() -> Result<(), RuntimeError> {
    let matches = App::new("recalc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Evaluates arithmetic expressions by iterative rewriting")
        .arg(
            Arg::with_name("expression")
                .multiple(true)
                .help("Expression to evaluate; omit for an interactive session"),
        )
        .get_matches();

    let stdout = stdout();
    let mut stdout = stdout.lock();

    if let Some(values) = matches.values_of("expression") {
        let expression = values.collect::<Vec<_>>().join("");
        writeln!(stdout, "{}", eval(&expression)?)?;
    } else if !atty::is(atty::Stream::Stdin) {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line?;
            match line.trim() {
                "" => (),
                s => writeln!(stdout, "{}", eval(s)?)?,
            }
        }
    } else {
        let mut con = Context::new();
        let mut completer = BasicCompleter::new(Vec::<String>::new());
        loop {
            let line = match con.read_line(Prompt::from(PROMPT), None, &mut completer) {
                Ok(line) => line,
                Err(ref e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    break
                }
                Err(e) => return Err(e.into()),
            };
            match line.trim() {
                "" => (),
                "exit" => break,
                s => match eval(s) {
                    Ok(value) => writeln!(stdout, "{}", value)?,
                    Err(e) => writeln!(stdout, "{} ({})", e, e.code())?,
                },
            }
            con.history.push(line.into())?;
        }
    }
    Ok(())
}

fn main() {
    let code = match calc() {
        Ok(()) => 0,
        Err(e) => {
            println!("{}", e);
            1
        }
    };
    exit(code)
}
