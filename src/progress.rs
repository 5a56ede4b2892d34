// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use crate::pipeline::{PassEvent, PassObserver};

/// Prints a badge when a pass starts and ends, and `N / total` as it goes.
#[derive(Default)]
pub struct TerminalObserver {
    strategy: &'static str,
    total: usize,
}

impl PassObserver for TerminalObserver {
    fn notify(&mut self, event: &PassEvent) {
        match event {
            PassEvent::Started { strategy, total } => {
                self.strategy = *strategy;
                self.total = *total;
                color_print::cprintln!("<c><bold>TeX: {}</></> ({})", strategy, total);
                color_print::cprintln!("0 / {}", total);
            }
            PassEvent::Rendered { .. } => (),
            PassEvent::AwaitingPaste { index } => {
                color_print::cprintln!("{} / {} <y>paste now</>", index, self.total);
            }
            PassEvent::Converted { index } => {
                color_print::cprintln!("{} / {}", index, self.total);
            }
            PassEvent::Unresolved { index } => {
                color_print::cprintln!("{} / {} <y>no image found, left pending</>", index, self.total);
            }
            PassEvent::Finished(report) if report.unresolved > 0 => {
                color_print::cprintln!(
                    "<c><bold>TeX: {} done</></> <y>({} of {} still pending)</>",
                    self.strategy,
                    report.unresolved,
                    report.total
                );
            }
            PassEvent::Finished(_) => {
                color_print::cprintln!("<c><bold>TeX: {} done</></> <g>✓</>", self.strategy);
            }
        }
    }
}
