use super::{Op, Operand, Quad};

/// Append-only instruction log plus the counters for fresh temporaries and
/// labels. One instance lives for one analysis session; counters never reset.
#[derive(Debug, Default)]
pub struct IntermediateCodeGenerator {
    code: Vec<Quad>,
    temp_index: usize,
    label_index: usize,
}

impl IntermediateCodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_temp(&mut self) -> String {
        let s = format!("t{}", self.temp_index);
        self.temp_index += 1;
        s
    }

    pub fn new_label(&mut self) -> String {
        let s = format!("L{}", self.label_index);
        self.label_index += 1;
        s
    }

    pub fn emit(
        &mut self,
        op: Op,
        arg1: Option<Operand>,
        arg2: Option<Operand>,
        result: Option<Operand>,
    ) {
        let quad = Quad::new(op, arg1, arg2, result);
        tracing::trace!(index = self.code.len(), "emit {}", quad);
        self.code.push(quad);
    }

    pub fn emit_label(&mut self, label: &str) {
        self.emit(Op::Label, Some(Operand::name(label)), None, None);
    }

    pub fn emit_goto(&mut self, label: &str) {
        self.emit(Op::Goto, None, None, Some(Operand::name(label)));
    }

    pub fn emit_if_not(&mut self, cond: Option<Operand>, label: &str) {
        self.emit(Op::IfNot, cond, None, Some(Operand::name(label)));
    }

    pub fn code(&self) -> &[Quad] {
        &self.code
    }

    pub fn into_code(self) -> Vec<Quad> {
        self.code
    }
}
