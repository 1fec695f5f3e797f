use crate::CameraTransform;

/// How two camera transforms are compared when deciding whether the camera
/// moved.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum MotionTest {
    /// Matrix and position must be exactly equal.
    #[default]
    Exact,

    /// Only the matrix must be exactly equal.
    MatrixOnly,

    /// Matrix and position must be equal within given epsilon.
    Tolerance(f32),
}

/// Outcome of [`ConvergenceController::advance()`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Convergence {
    /// Step to store in the camera's record.
    pub step: u32,

    /// Whether new samples should be traced this frame.
    pub trace: bool,

    /// How far the image is from its sample cap, in 0..=1.
    pub ratio: f32,
}

/// Decides, each frame, whether accumulation continues, resets or is frozen
/// at the sample cap.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConvergenceController {
    motion: MotionTest,
}

impl ConvergenceController {
    pub fn new(motion: MotionTest) -> Self {
        Self { motion }
    }

    pub fn is_static(
        &self,
        prev: Option<&CameraTransform>,
        curr: &CameraTransform,
    ) -> bool {
        let Some(prev) = prev else {
            return false;
        };

        match self.motion {
            MotionTest::Exact => prev == curr,
            MotionTest::MatrixOnly => prev.xform == curr.xform,
            MotionTest::Tolerance(eps) => {
                prev.xform.abs_diff_eq(curr.xform, eps)
                    && prev.position.abs_diff_eq(curr.position, eps)
            }
        }
    }

    /// Returns the step that follows `prev_step`: one more if the camera
    /// stayed where it was and accumulation is enabled, zero otherwise.
    pub fn next_step(
        &self,
        prev: Option<&CameraTransform>,
        curr: &CameraTransform,
        accumulation: bool,
        prev_step: u32,
    ) -> u32 {
        if accumulation && self.is_static(prev, curr) {
            prev_step.saturating_add(1)
        } else {
            0
        }
    }

    pub fn should_trace(step: u32, max_samples: u32) -> bool {
        step < max_samples
    }

    pub fn convergence_ratio(step: u32, max_samples: u32) -> f32 {
        if max_samples == 0 {
            return 1.0;
        }

        (step as f32 / max_samples as f32).clamp(0.0, 1.0)
    }

    /// Computes this frame's convergence.
    ///
    /// Once the next step would reach `max_samples`, the stored step stops
    /// advancing and tracing is skipped; the image is considered converged
    /// and the reported ratio is 1.0.
    pub fn advance(
        &self,
        prev: Option<&CameraTransform>,
        curr: &CameraTransform,
        accumulation: bool,
        prev_step: u32,
        max_samples: u32,
    ) -> Convergence {
        let step = self.next_step(prev, curr, accumulation, prev_step);
        let trace = Self::should_trace(step, max_samples);

        Convergence {
            step: if trace {
                step
            } else {
                prev_step.min(max_samples.saturating_sub(1))
            },
            trace,
            ratio: Self::convergence_ratio(step, max_samples),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{vec3, Mat4};

    use super::*;

    fn at(x: f32) -> CameraTransform {
        CameraTransform::new(Mat4::from_translation(vec3(x, 0.0, 0.0)))
    }

    fn run(
        target: &ConvergenceController,
        transforms: &[CameraTransform],
        accumulation: bool,
        max_samples: u32,
    ) -> Vec<(u32, bool)> {
        let mut prev = None;
        let mut step = 0;

        transforms
            .iter()
            .map(|curr| {
                let convergence = target.advance(
                    prev.as_ref(),
                    curr,
                    accumulation,
                    step,
                    max_samples,
                );

                prev = Some(*curr);
                step = convergence.step;

                (convergence.step, convergence.trace)
            })
            .collect()
    }

    #[test]
    fn monotonic_while_static() {
        let target = ConvergenceController::default();
        let actual = run(&target, &[at(0.0); 10], true, 1000);

        for (frame, (step, trace)) in actual.into_iter().enumerate() {
            assert_eq!(frame as u32, step);
            assert!(trace);
        }
    }

    #[test]
    fn capped_at_max_samples() {
        let target = ConvergenceController::default();
        let actual = run(&target, &[at(0.0); 6], true, 4);

        assert_eq!(
            vec![
                (0, true),
                (1, true),
                (2, true),
                (3, true),
                (3, false),
                (3, false)
            ],
            actual
        );
    }

    #[test]
    fn resets_on_motion() {
        let target = ConvergenceController::default();

        let actual = run(
            &target,
            &[at(0.0), at(0.0), at(1.0), at(1.0), at(1.0)],
            true,
            1000,
        );

        let steps: Vec<_> = actual.into_iter().map(|(step, _)| step).collect();

        assert_eq!(vec![0, 1, 0, 1, 2], steps);
    }

    #[test]
    fn tiny_motion_resets_exact_test() {
        let target = ConvergenceController::default();

        assert_eq!(
            0,
            target.next_step(Some(&at(0.0)), &at(f32::EPSILON), true, 7)
        );
    }

    #[test]
    fn resets_when_accumulation_is_disabled() {
        let target = ConvergenceController::default();
        let actual = run(&target, &[at(0.0); 4], false, 1000);

        assert!(actual.iter().all(|(step, trace)| *step == 0 && *trace));
    }

    #[test]
    fn motion_tests() {
        let exact = ConvergenceController::new(MotionTest::Exact);
        let matrix_only = ConvergenceController::new(MotionTest::MatrixOnly);
        let tolerant = ConvergenceController::new(MotionTest::Tolerance(1e-3));

        let a = at(0.0);

        let b = CameraTransform {
            position: vec3(5.0, 0.0, 0.0),
            ..a
        };

        assert!(!exact.is_static(Some(&a), &b));
        assert!(matrix_only.is_static(Some(&a), &b));

        assert!(tolerant.is_static(Some(&a), &at(1e-4)));
        assert!(!tolerant.is_static(Some(&a), &at(1e-2)));

        assert!(!exact.is_static(None, &a));
    }

    #[test]
    fn ratio_bounds() {
        for max_samples in [1, 2, 7, 2048] {
            for step in [0, 1, 5, 2047, 2048, 5000, u32::MAX] {
                let ratio =
                    ConvergenceController::convergence_ratio(step, max_samples);

                assert!((0.0..=1.0).contains(&ratio));
            }
        }

        assert_eq!(0.5, ConvergenceController::convergence_ratio(2, 4));
        assert_eq!(1.0, ConvergenceController::convergence_ratio(4, 4));
    }

    #[test]
    fn ratio_reaches_one_when_converged() {
        let target = ConvergenceController::default();
        let convergence = target.advance(Some(&at(0.0)), &at(0.0), true, 3, 4);

        assert!(!convergence.trace);
        assert_eq!(3, convergence.step);
        assert_eq!(1.0, convergence.ratio);
    }
}
