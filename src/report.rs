//! Human-readable tables for `print`

use std::fmt::Write;

use crate::mmu::Mmu;

pub fn mmu_table(mmu: &Mmu) -> String {
    let mut out = String::new();
    out.push_str(" PID  | Variable Name | Virtual Addr | Size\n");
    out.push_str("------+---------------+--------------+------------\n");
    for process in mmu.processes() {
        for var in process.variables() {
            let _ = writeln!(
                out,
                "{:5} | {:<13} |   0x{:08X} | {:10}",
                process.pid, var.name, var.virtual_address, var.size
            );
        }
    }
    out
}

pub fn page_table(mmu: &Mmu) -> String {
    let mut out = String::new();
    out.push_str(" PID  | Page Number | Frame Number\n");
    out.push_str("------+-------------+--------------\n");
    for (key, frame) in mmu.page_table().sorted_entries() {
        let _ = writeln!(out, "{:5} | {:11} | {:12}", key.pid, key.page, frame);
    }
    out
}

pub fn process_list(mmu: &Mmu) -> String {
    let mut out = String::new();
    for process in mmu.processes() {
        let _ = writeln!(out, "{}", process.pid);
    }
    out
}

/// Comma-separated element values, elided after `limit` of `total`
pub fn value_list<T: std::fmt::Display>(values: &[T], total: usize, limit: usize) -> String {
    let shown: Vec<String> = values.iter().take(limit).map(|v| v.to_string()).collect();
    let mut out = shown.join(", ");
    if total > limit {
        let _ = write!(out, ", ... [{} items]", total);
    }
    out
}
