//! Two-stack recording tape for reverse-mode (adjoint) sweeps.
//!
//! During a recording every operation on [`Reverse`] values pushes its
//! precomputed partial derivatives (multipliers) and operand indices. The tape
//! also owns one derivative slot per registered variable: callers seed output
//! slots, run [`Tape::compute_adjoints`], read input slots, and
//! [`Tape::clear_derivatives`] before the next seed.

use std::cell::Cell;
use std::marker::PhantomData;

use crate::reverse::Reverse;
use crate::Float;

/// Sentinel index for values that are not registered on any tape.
pub const CONSTANT: u32 = u32::MAX;

/// A recorded operation: its result lives at `lhs_index`, and its operands'
/// multipliers/indices span `[prev.end_plus_one .. self.end_plus_one)`.
#[derive(Clone, Copy, Debug)]
struct Statement {
    lhs_index: u32,
    end_plus_one: u32,
}

/// Recording tape with per-variable derivative slots.
///
/// Lifecycle of one adjoint computation:
///
/// 1. [`register_inputs`](Tape::register_inputs)
/// 2. [`new_recording`](Tape::new_recording), then evaluate with the tape
///    [activated](Tape::activate)
/// 3. [`register_outputs`](Tape::register_outputs)
/// 4. per output: seed with [`set_derivative`](Tape::set_derivative),
///    [`compute_adjoints`](Tape::compute_adjoints), read
///    [`derivative`](Tape::derivative),
///    [`clear_derivatives`](Tape::clear_derivatives)
pub struct Tape<F: Float> {
    statements: Vec<Statement>,
    multipliers: Vec<F>,
    indices: Vec<u32>,
    num_variables: u32,
    derivatives: Vec<F>,
}

impl<F: Float> Default for Tape<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Tape<F> {
    /// Create an empty tape.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a tape with room for roughly `est_ops` recorded operations.
    pub fn with_capacity(est_ops: usize) -> Self {
        let mut statements = Vec::with_capacity(est_ops + 1);
        // Sentinel so that `statements[i - 1].end_plus_one` is valid for i >= 1.
        statements.push(Statement {
            lhs_index: 0,
            end_plus_one: 0,
        });
        Tape {
            statements,
            multipliers: Vec::with_capacity(est_ops * 2),
            indices: Vec::with_capacity(est_ops * 2),
            num_variables: 0,
            derivatives: Vec::new(),
        }
    }

    /// Number of variables (registered inputs and recorded results) so far.
    pub fn num_variables(&self) -> usize {
        self.num_variables as usize
    }

    /// Number of operations in the current recording.
    pub fn num_statements(&self) -> usize {
        self.statements.len() - 1
    }

    #[inline]
    fn new_slot(&mut self) -> u32 {
        let idx = self.num_variables;
        assert!(idx != CONSTANT, "tape variable index space exhausted");
        self.num_variables += 1;
        idx
    }

    /// Make `x` an independent variable of this tape.
    ///
    /// The value is kept; only its tape index changes. Any previous
    /// registration (on this or another tape) is replaced.
    pub fn register_input(&mut self, x: &mut Reverse<F>) {
        x.index = self.new_slot();
    }

    /// Register every value in `xs` as an independent variable.
    pub fn register_inputs(&mut self, xs: &mut [Reverse<F>]) {
        for x in xs {
            self.register_input(x);
        }
    }

    /// Give `y` a derivative slot so it can be seeded.
    ///
    /// Values produced by recorded operations already have one. An output that
    /// never touched the tape (a constant) gets a fresh leaf slot, which makes
    /// its Jacobian row come out as zeros.
    pub fn register_output(&mut self, y: &mut Reverse<F>) {
        if y.index == CONSTANT {
            y.index = self.new_slot();
        }
    }

    /// Register every value in `ys` as an output.
    pub fn register_outputs(&mut self, ys: &mut [Reverse<F>]) {
        for y in ys {
            self.register_output(y);
        }
    }

    /// Discard the recorded operations and all derivative state.
    ///
    /// Registered variables keep their slots, so inputs may be registered
    /// before the recording starts. Slots are only released by
    /// [`clear`](Tape::clear).
    pub fn new_recording(&mut self) {
        self.statements.truncate(1);
        self.multipliers.clear();
        self.indices.clear();
        self.clear_derivatives();
    }

    /// Reset the tape to its freshly constructed state.
    ///
    /// All previously registered values become dangling and must be
    /// registered again.
    pub fn clear(&mut self) {
        self.new_recording();
        self.num_variables = 0;
        self.derivatives.clear();
    }

    /// Record a unary operation: `result = f(operand)` with `multiplier = df/d(operand)`.
    #[inline]
    pub fn push_unary(&mut self, operand_idx: u32, multiplier: F) -> u32 {
        let result_idx = self.new_slot();
        if operand_idx != CONSTANT {
            self.multipliers.push(multiplier);
            self.indices.push(operand_idx);
        }
        self.push_statement(result_idx);
        result_idx
    }

    /// Record a binary operation with precomputed partial derivatives.
    #[inline]
    pub fn push_binary(&mut self, lhs_idx: u32, lhs_mult: F, rhs_idx: u32, rhs_mult: F) -> u32 {
        let result_idx = self.new_slot();
        if lhs_idx != CONSTANT {
            self.multipliers.push(lhs_mult);
            self.indices.push(lhs_idx);
        }
        if rhs_idx != CONSTANT {
            self.multipliers.push(rhs_mult);
            self.indices.push(rhs_idx);
        }
        self.push_statement(result_idx);
        result_idx
    }

    #[inline]
    fn push_statement(&mut self, lhs_index: u32) {
        self.statements.push(Statement {
            lhs_index,
            end_plus_one: self.multipliers.len() as u32,
        });
    }

    fn ensure_slots(&mut self) {
        let n = self.num_variables as usize;
        if self.derivatives.len() < n {
            self.derivatives.resize(n, F::zero());
        }
    }

    /// Current derivative of `v`. Unregistered values read as zero.
    pub fn derivative(&self, v: &Reverse<F>) -> F {
        if v.index == CONSTANT {
            return F::zero();
        }
        self.derivatives
            .get(v.index as usize)
            .copied()
            .unwrap_or_else(F::zero)
    }

    /// Mutable access to the derivative slot of `v`.
    ///
    /// # Panics
    ///
    /// If `v` is not registered on this tape.
    pub fn derivative_mut(&mut self, v: &Reverse<F>) -> &mut F {
        assert!(
            v.index != CONSTANT && v.index < self.num_variables,
            "value is not registered on this tape"
        );
        self.ensure_slots();
        &mut self.derivatives[v.index as usize]
    }

    /// Set the derivative slot of `v`, typically to seed a sweep.
    pub fn set_derivative(&mut self, v: &Reverse<F>, value: F) {
        *self.derivative_mut(v) = value;
    }

    /// Propagate the seeded derivatives backward through the current recording.
    ///
    /// Adjoints accumulate into every slot reachable from a seed, including
    /// registered inputs. Nothing is reset, so call
    /// [`clear_derivatives`](Tape::clear_derivatives) before seeding again.
    pub fn compute_adjoints(&mut self) {
        self.ensure_slots();
        let adjoints = &mut self.derivatives;
        for i in (1..self.statements.len()).rev() {
            let stmt = self.statements[i];
            let a = adjoints[stmt.lhs_index as usize];
            if a == F::zero() {
                continue;
            }
            let start = self.statements[i - 1].end_plus_one as usize;
            let end = stmt.end_plus_one as usize;
            for j in start..end {
                let k = self.indices[j] as usize;
                adjoints[k] = adjoints[k] + self.multipliers[j] * a;
            }
        }
    }

    /// Zero every derivative slot, keeping the recording.
    pub fn clear_derivatives(&mut self) {
        for d in self.derivatives.iter_mut() {
            *d = F::zero();
        }
    }
}

impl<F: TapeThreadLocal> Tape<F> {
    /// Make this tape the active tape of the current thread until the
    /// returned guard is dropped.
    ///
    /// The guard borrows the tape, so the tape outlives its registration:
    ///
    /// ```compile_fail
    /// use jacobian_ad::Tape;
    ///
    /// let guard = {
    ///     let mut tape = Tape::<f64>::new();
    ///     tape.activate()
    /// };
    /// drop(guard);
    /// ```
    pub fn activate(&mut self) -> TapeGuard<'_, F> {
        TapeGuard::new(self)
    }

    /// Whether some tape is active for `F` on the current thread.
    pub fn is_active() -> bool {
        !active_tape_ptr::<F>().is_null()
    }
}

// Thread-local active tape pointer.
thread_local! {
    static TAPE_F32: Cell<*mut Tape<f32>> = const { Cell::new(std::ptr::null_mut()) };
    static TAPE_F64: Cell<*mut Tape<f64>> = const { Cell::new(std::ptr::null_mut()) };
}

/// Selects the thread-local active-tape slot for a given float type.
pub trait TapeThreadLocal: Float {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut Tape<Self>>>;
}

impl TapeThreadLocal for f32 {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut Tape<Self>>> {
        &TAPE_F32
    }
}

impl TapeThreadLocal for f64 {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut Tape<Self>>> {
        &TAPE_F64
    }
}

fn active_tape_ptr<F: TapeThreadLocal>() -> *mut Tape<F> {
    F::cell().with(|cell| cell.get())
}

/// Access the active tape for the current thread. Panics if no tape is active.
#[inline]
pub fn with_active_tape<F: TapeThreadLocal, R>(f: impl FnOnce(&mut Tape<F>) -> R) -> R {
    let ptr = active_tape_ptr::<F>();
    assert!(
        !ptr.is_null(),
        "No active tape. Activate one with Tape::activate() or use a Jacobian entry point."
    );
    // SAFETY: the registering TapeGuard borrows the pointee for as long as
    // it is registered, and the reference does not escape this closure-based,
    // single-threaded access.
    let tape = unsafe { &mut *ptr };
    f(tape)
}

/// Run `body` on the tape a Jacobian computation should use.
///
/// Preference order: the supplied tape, the thread's active tape, a temporary
/// tape that is dropped when `body` returns (or unwinds).
pub(crate) fn with_default_tape<F: TapeThreadLocal, R>(
    tape: Option<&mut Tape<F>>,
    body: impl FnOnce(&mut Tape<F>) -> R,
) -> R {
    if let Some(tape) = tape {
        tracing::trace!("using caller-supplied tape");
        return body(tape);
    }
    let active = active_tape_ptr::<F>();
    if !active.is_null() {
        tracing::trace!("using the thread's active tape");
        // SAFETY: the registering guard borrows the tape and outlives this
        // call, which is synchronous and runs on the registering thread.
        return body(unsafe { &mut *active });
    }
    tracing::trace!("using a scoped temporary tape");
    let mut scoped = Tape::new();
    body(&mut scoped)
}

/// RAII guard that sets a tape as the thread-local active tape and restores
/// the previous one on drop.
///
/// The guard holds the tape's mutable borrow for `'a`.
pub struct TapeGuard<'a, F: TapeThreadLocal> {
    prev: *mut Tape<F>,
    _tape: PhantomData<&'a mut Tape<F>>,
}

impl<'a, F: TapeThreadLocal> TapeGuard<'a, F> {
    /// Activate `tape` as the thread-local tape. Returns a guard that restores
    /// the previous tape on drop.
    pub fn new(tape: &'a mut Tape<F>) -> Self {
        let prev = F::cell().with(|cell| cell.replace(tape as *mut Tape<F>));
        TapeGuard {
            prev,
            _tape: PhantomData,
        }
    }
}

impl<F: TapeThreadLocal> Drop for TapeGuard<'_, F> {
    fn drop(&mut self) {
        F::cell().with(|cell| cell.set(self.prev));
    }
}
