use std::cell::RefCell;
#[cfg(test)]
use std::cell::Ref;
use std::io::{BufRead, Write};
use std::rc::Rc;

use semispace::{Heap, HeapConfig, HeapError, HeapReport, Inspector};

use crate::command::{parse, Command, Value};
use crate::error::{ErrorKind, RuntimeError};

/// Output shared between the shell and the heap's collection reports so both
/// arrive in order
pub type Output<W> = Rc<RefCell<W>>;

/// Writes every collection report to the shell output
struct WriteReport<W: Write> {
    out: Output<W>,
}

impl<W: Write> Inspector for WriteReport<W> {
    fn inspect(&mut self, report: &HeapReport) {
        if let Err(err) = write!(self.out.borrow_mut(), "{}", report) {
            log::warn!("could not write collection report: {}", err);
        }
    }
}

/// Executes shell commands against a heap
pub struct Shell<W: Write + 'static> {
    heap: Heap,
    out: Output<W>,
}

impl<W: Write + 'static> Shell<W> {
    pub fn new(config: HeapConfig, out: W) -> Result<Shell<W>, RuntimeError> {
        let out = Rc::new(RefCell::new(out));
        let heap = Heap::with_inspector(
            config,
            Box::new(WriteReport {
                out: Rc::clone(&out),
            }),
        )?;

        Ok(Shell { heap, out })
    }

    #[cfg(test)]
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    #[cfg(test)]
    pub fn output(&self) -> Ref<'_, W> {
        self.out.borrow()
    }

    /// Parse and execute one line. Bad commands and heap errors are reported
    /// and the shell carries on; only output failures are returned.
    pub fn run_line(&mut self, line: &str) -> Result<(), RuntimeError> {
        let result = match parse(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Ok(()),
            Err(err) => Err(err),
        };

        let err = match result {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };

        match err.error_kind() {
            ErrorKind::HeapError(HeapError::OutOfMemory) => {
                writeln!(self.out.borrow_mut(), "OUT OF MEMORY")?;
            }
            ErrorKind::CommandError(_) => eprintln!("{}", err),
            ErrorKind::HeapError(_) => eprintln!("error: {}", err),
            _ => return Err(err),
        }

        Ok(())
    }

    /// Run every line of a script
    pub fn run_script<R: BufRead>(&mut self, script: R) -> Result<(), RuntimeError> {
        for (count, line) in script.lines().enumerate() {
            // count starts at 0, line numbers start at 1
            let line = line.map_err(|err| RuntimeError::from(err).at_line(count + 1))?;
            self.run_line(&line)?;
        }

        self.out.borrow_mut().flush()?;
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<(), RuntimeError> {
        match command {
            Command::Print => write!(self.out.borrow_mut(), "{}", self.heap.report())?,

            Command::Debug => write!(self.out.borrow_mut(), "{}", self.heap.dump())?,

            // the report is written by the heap's inspector
            Command::Collect => {
                self.heap.collect();
            }

            Command::Assign { target, value } => {
                let value = match value {
                    Value::New(object_type) => Some(self.heap.new_object(object_type)?),
                    Value::Nil => None,
                    Value::Path(path) => self.heap.get(&path)?,
                };

                self.heap.set(&target, value)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use semispace::ObjectType;

    fn run(size: usize, script: &str) -> (String, Shell<Vec<u8>>) {
        let mut shell = Shell::new(HeapConfig::new(size).unwrap(), Vec::new()).unwrap();
        shell.run_script(script.as_bytes()).unwrap();
        let text = String::from_utf8(shell.output().clone()).unwrap();
        (text, shell)
    }

    #[test]
    fn collect_reports_survivors() {
        let script = "
            # two linked objects and one that only a dropped root knew about
            x = Alpha
            x.c = Beta
            unreachable = Gamma
            unreachable = NULL
            COLLECT
        ";

        let (text, shell) = run(200, script);
        assert_eq!(text, "Objects in from-space:\n - 0:Alpha\n - 1:Beta\n");

        let xc = shell.heap().get(&"x.c".parse().unwrap()).unwrap().unwrap();
        assert_eq!(shell.heap().type_of(xc), Ok(ObjectType::Beta));
    }

    #[test]
    fn print_shows_garbage_until_collected() {
        let script = "
            x = Gamma
            x = Gamma
            PRINT
            COLLECT
        ";

        let (text, _) = run(200, script);
        assert_eq!(
            text,
            "Objects in from-space:\n - 0:Gamma\n - 1:Gamma\n\
             Objects in from-space:\n - 1:Gamma\n"
        );
    }

    #[test]
    fn out_of_memory_is_reported() {
        // 40 byte regions: two Gammas fit
        let script = "
            a = Gamma
            a.b = Gamma
            a.c = Gamma
            PRINT
        ";

        let (text, shell) = run(80, script);
        assert_eq!(
            text,
            "Objects in from-space:\n - 0:Gamma\n - 1:Gamma\n\
             OUT OF MEMORY\n\
             Objects in from-space:\n - 0:Gamma\n - 1:Gamma\n"
        );
        assert!(shell.heap().get(&"a.c".parse().unwrap()).unwrap().is_none());
    }

    #[test]
    fn errors_do_not_stop_the_shell() {
        let script = "
            nonsense
            y = missing.c
            x = Alpha
            x.z = Beta
            PRINT
        ";

        let (text, shell) = run(200, script);
        // the Beta was allocated before the bad field was found
        assert_eq!(text, "Objects in from-space:\n - 0:Alpha\n - 1:Beta\n");
        assert_eq!(shell.heap().roots().len(), 1);
    }

    #[test]
    fn paths_copy_pointers() {
        let script = "
            x = Alpha
            x.d = Gamma
            y = x.d
            x = NULL
            COLLECT
        ";

        let (text, shell) = run(200, script);
        assert_eq!(text, "Objects in from-space:\n - 1:Gamma\n");
        let y = shell.heap().get(&"y".parse().unwrap()).unwrap().unwrap();
        assert_eq!(y.offset(), 0);
    }

    #[test]
    fn debug_dump() {
        let (text, _) = run(200, "x = Beta\nDEBUG\n");
        assert!(text.contains("x -> 0"));
        assert!(text.contains("#0 Beta c=nil f=nil"));
    }
}
