use clap::ValueEnum;
use macrofa::ctr::{Ctr, CtrParseError};
use macrofa::dfa::{Dfa, DfaParseError};
use macrofa::dpda::{Dpda, DpdaParseError};
use macrofa::emit::Header;
use macrofa::parser::{self, ParseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error<'a> {
    #[error("Error parsing description: {0}")]
    Parse(ParseError),
    #[error("Error compiling DFA: {0}")]
    DfaCompile(DfaParseError<'a>),
    #[error("Error compiling counter machine: {0}")]
    CtrCompile(CtrParseError<'a>),
    #[error("Error compiling DPDA: {0}")]
    DpdaCompile(DpdaParseError<'a>),
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MachineType {
    #[default]
    Dfa,
    Ctr,
    Dpda,
}

impl MachineType {
    pub fn describe(self) -> &'static str {
        match self {
            MachineType::Dfa => "DFA",
            MachineType::Ctr => "counter machine",
            MachineType::Dpda => "DPDA",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Machine {
    Dfa(Dfa),
    Ctr(Ctr),
    Dpda(Dpda),
}

impl Machine {
    /// Loads a machine of the given flavor by parsing and validating a
    /// description.
    pub fn load(file: &str, r#type: MachineType) -> Result<Machine, Error> {
        match r#type {
            MachineType::Dfa => {
                let dfa: Dfa = parser::dfa(file)
                    .map_err(Error::Parse)?
                    .try_into()
                    .map_err(Error::DfaCompile)?;
                Ok(Machine::Dfa(dfa))
            }
            MachineType::Ctr => {
                let ctr: Ctr = parser::ctr(file)
                    .map_err(Error::Parse)?
                    .try_into()
                    .map_err(Error::CtrCompile)?;
                Ok(Machine::Ctr(ctr))
            }
            MachineType::Dpda => {
                let dpda: Dpda = parser::dpda(file)
                    .map_err(Error::Parse)?
                    .try_into()
                    .map_err(Error::DpdaCompile)?;
                Ok(Machine::Dpda(dpda))
            }
        }
    }

    /// The complete header file set realizing this machine.
    pub fn emit(&self) -> Vec<Header> {
        match self {
            Machine::Dfa(dfa) => dfa.emit(),
            Machine::Ctr(ctr) => ctr.emit(),
            Machine::Dpda(dpda) => dpda.emit(),
        }
    }

    /// The header the caller includes after defining `INPUT`.
    pub fn entry_header(&self) -> &'static str {
        match self {
            Machine::Dfa(_) => "dfa.h",
            Machine::Ctr(_) => "ctr.h",
            Machine::Dpda(_) => "dpda.h",
        }
    }

    pub fn table(&self) -> String {
        match self {
            Machine::Dfa(dfa) => dfa.to_table(),
            Machine::Ctr(ctr) => ctr.to_table(),
            Machine::Dpda(dpda) => dpda.to_table(),
        }
    }
}
