use crate::views::*;

/// Evaluate the full linear convolution of one channel of `input` with `impulse` by directly evaluating the sum.
///
/// Complexity is `theta(M*N)` where `M` is the impulse length and `N` the input's length.  This is only a good idea for
/// short impulses; it has no transform step, no latency, and no state.
///
/// Output frame `i` receives `sum(input[i - j] * impulse[j])` over all taps `j`, where input frames outside the view
/// are treated as zero.  So the output must be exactly `M - 1` frames longer than the input: the first input frame
/// only starts to ring at output frame 0, and the last one finishes at the final output frame.  Unlike many
/// convolution routines the impulse is in its natural order, not reversed.
///
/// Whether the output is written or added to depends on the output view.  Streaming callers use this to overlap-add:
/// convolve a block into scratch space, then carry the last `M - 1` frames over into the next block.
///
/// # Panics
///
/// Panics if the channels are out of range, if the impulse is empty, or if the output is not the right length, as
/// these are (or should be) programmer bugs.
pub fn convolve_direct(
    input: &(impl ViewMeta<SampleType = f32> + InputView),
    input_channel: usize,
    output: &mut (impl ViewMeta<SampleType = f32> + OutputView),
    output_channel: usize,
    impulse: &[f32],
) {
    assert!(input_channel < input.get_channels());
    assert!(output_channel < output.get_channels());
    assert!(!impulse.is_empty());
    assert_eq!(output.get_frames(), input.get_frames() + impulse.len() - 1);

    let input_frames = input.get_frames();
    let num_input_channels = input.get_channels();
    let num_output_channels = output.get_channels();

    for frame in 0..output.get_frames() {
        // Only taps which land on an input frame contribute: `frame - tap` must be in `0..input_frames`.
        let first_tap = (frame + 1).saturating_sub(input_frames);
        let last_tap = frame.min(impulse.len() - 1);

        // We could use f64 which would help with precision, but this is only used with short impulses.
        let mut sum: f32 = 0.0;
        for tap in first_tap..=last_tap {
            let input_frame = frame - tap;
            let input_ind = input_frame * num_input_channels + input_channel;
            unsafe {
                sum += *impulse.get_unchecked(tap) * input.read_index_unchecked(input_ind);
            }
        }

        let output_index = frame * num_output_channels + output_channel;
        unsafe { output.write_index_unchecked(output_index, sum) };
    }
}
