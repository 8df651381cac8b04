//! Command execution on top of the MMU core and simulated physical memory

use crate::command::{Command, PrintTarget};
use crate::config::Config;
use crate::constants::PRINT_ELEMENT_LIMIT;
use crate::error::{MmuError, Result};
use crate::memory::PhysicalMemory;
use crate::mmu::Mmu;
use crate::report;
use crate::translation::page_chunks;
use crate::value::Value;

pub struct Simulator {
    config: Config,
    mmu: Mmu,
    memory: PhysicalMemory,
}

impl Simulator {
    pub fn new(config: Config) -> Result<Self> {
        let mmu = Mmu::new(&config)?;
        Ok(Simulator {
            config,
            mmu,
            memory: PhysicalMemory::new(config.memory_size),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mmu(&self) -> &Mmu {
        &self.mmu
    }

    /// Run one command and return the text to show the user (possibly empty)
    pub fn execute(&mut self, command: &Command) -> Result<String> {
        match command {
            Command::Create {
                text_size,
                data_size,
            } => {
                let pid = self.mmu.create_program(*text_size, *data_size)?;
                Ok(pid.to_string())
            }
            Command::Allocate {
                pid,
                name,
                kind,
                count,
            } => {
                let address = self.mmu.allocate(*pid, name, *kind, *count)?;
                Ok(address.to_string())
            }
            Command::Set {
                pid,
                name,
                offset,
                values,
            } => {
                self.set_values(*pid, name, *offset, values)?;
                Ok(String::new())
            }
            Command::Free { pid, name } => {
                self.mmu.free(*pid, name)?;
                Ok(String::new())
            }
            Command::Terminate { pid } => {
                self.mmu.terminate(*pid)?;
                Ok(String::new())
            }
            Command::Print(target) => self.print(target),
            Command::Exit => Ok(String::new()),
        }
    }

    /// Store `values` into consecutive elements of a variable, starting at
    /// element `offset`. Nothing is written unless every value parses and fits.
    pub fn set_values(
        &mut self,
        pid: u32,
        name: &str,
        offset: u32,
        values: &[String],
    ) -> Result<()> {
        let variable = self.mmu.variable(pid, name)?;
        let kind = variable.kind;
        let count = variable.element_count();

        let last = offset as u64 + values.len() as u64;
        if values.is_empty() || last > count as u64 {
            return Err(MmuError::OutOfBounds {
                name: name.to_string(),
                index: last.saturating_sub(1).min(u32::MAX as u64) as u32,
                count,
            });
        }

        let parsed = values
            .iter()
            .map(|text| Value::parse(kind, text))
            .collect::<Result<Vec<Value>>>()?;

        for (i, value) in parsed.into_iter().enumerate() {
            let address = self.mmu.element_address(pid, name, offset + i as u32)?;
            self.write_virtual(pid, address, &value.to_bytes())?;
        }
        Ok(())
    }

    /// Decode up to `limit` leading elements of a variable
    pub fn read_values(&self, pid: u32, name: &str, limit: usize) -> Result<Vec<Value>> {
        let variable = self.mmu.variable(pid, name)?;
        let kind = variable.kind;
        let shown = (variable.element_count() as usize).min(limit);

        let mut values = Vec::with_capacity(shown);
        for index in 0..shown as u32 {
            let address = self.mmu.element_address(pid, name, index)?;
            let bytes = self.read_virtual(pid, address, kind.size_of())?;
            if let Some(value) = Value::from_bytes(kind, &bytes) {
                values.push(value);
            }
        }
        Ok(values)
    }

    fn print(&self, target: &PrintTarget) -> Result<String> {
        let text = match target {
            PrintTarget::Mmu => report::mmu_table(&self.mmu),
            PrintTarget::Page => report::page_table(&self.mmu),
            PrintTarget::Processes => report::process_list(&self.mmu),
            PrintTarget::Variable { pid, name } => {
                let total = self.mmu.variable(*pid, name)?.element_count() as usize;
                let values = self.read_values(*pid, name, PRINT_ELEMENT_LIMIT)?;
                report::value_list(&values, total, PRINT_ELEMENT_LIMIT)
            }
        };
        Ok(text)
    }

    /// Write through the page table, one page-sized piece at a time, since
    /// neighbouring virtual pages need not sit in neighbouring frames.
    fn write_virtual(&mut self, pid: u32, address: u32, bytes: &[u8]) -> Result<()> {
        let mut written = 0usize;
        let page_size = self.mmu.page_size();
        for (virtual_address, len) in page_chunks(address, bytes.len() as u32, page_size) {
            let physical = self.mmu.translate(pid, virtual_address)?;
            self.memory.write(physical, &bytes[written..written + len as usize]);
            written += len as usize;
        }
        Ok(())
    }

    fn read_virtual(&self, pid: u32, address: u32, len: u32) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(len as usize);
        for (virtual_address, piece) in page_chunks(address, len, self.mmu.page_size()) {
            let physical = self.mmu.translate(pid, virtual_address)?;
            bytes.extend_from_slice(self.memory.read(physical, piece));
        }
        Ok(bytes)
    }
}
