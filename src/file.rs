use failure::Error;

use std::fmt::Debug;
use std::fs;
use std::path::Path;

use crate::log;
use crate::Interpreter;

impl Interpreter {
    /// run every form in a file against the shared global frame, printing
    /// each non-Void result on its own line
    pub fn run_file<P>(&self, path: P) -> Result<(), Error>
    where
        P: AsRef<Path> + Debug,
    {
        log::info(format!("running {:?}...", path));

        let source = fs::read_to_string(path)?;
        for result in self.run(source)? {
            if !result.is_void() {
                println!("{}", result);
            }
        }

        log::info("run_file: done");
        Ok(())
    }
}
