use std::collections::HashMap;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;

use baitcheck_model::{argmax, FusionHead};

const TEST_HIDDEN: usize = 4;

// Head with zeroed projection weights: logits collapse to the output bias,
// which makes the softmax result exact and easy to assert.
fn head_with_output_bias(bias: [f32; 2]) -> FusionHead {
    let dev = Device::Cpu;
    let mut tensors: HashMap<String, Tensor> = HashMap::new();
    tensors.insert(
        "0.weight".to_string(),
        Tensor::zeros((128, 2 * TEST_HIDDEN), DType::F32, &dev).unwrap(),
    );
    tensors.insert("0.bias".to_string(), Tensor::zeros(128, DType::F32, &dev).unwrap());
    tensors.insert("3.weight".to_string(), Tensor::zeros((2, 128), DType::F32, &dev).unwrap());
    tensors.insert("3.bias".to_string(), Tensor::new(&bias, &dev).unwrap());
    let vb = VarBuilder::from_tensors(tensors, DType::F32, &dev);
    FusionHead::load(vb, TEST_HIDDEN).expect("head")
}

fn probabilities(head: &FusionHead) -> Vec<f32> {
    let dev = Device::Cpu;
    let title = Tensor::ones((1, TEST_HIDDEN), DType::F32, &dev).unwrap();
    let content = Tensor::ones((1, TEST_HIDDEN), DType::F32, &dev).unwrap();
    let logits = head.forward(&title, &content).expect("forward");
    candle_nn::ops::softmax(&logits, 1)
        .unwrap()
        .squeeze(0)
        .unwrap()
        .to_vec1()
        .unwrap()
}

#[test]
fn softmax_pair_sums_to_one() {
    let head = head_with_output_bias([0.2, 1.3]);
    let probs = probabilities(&head);
    assert_eq!(probs.len(), 2);
    assert!((probs[0] + probs[1] - 1.0).abs() <= 1e-6);
    assert!(probs[1] > probs[0], "larger logit wins");
}

#[test]
fn equal_logits_split_evenly_and_tie_goes_to_class_zero() {
    let head = head_with_output_bias([0.0, 0.0]);
    let probs = probabilities(&head);
    assert!((probs[0] - 0.5).abs() <= 1e-6);
    assert!((probs[1] - 0.5).abs() <= 1e-6);
    assert_eq!(argmax(&probs), 0, "ties resolve to the lowest class index");
}

#[test]
fn argmax_picks_largest_and_breaks_ties_low() {
    assert_eq!(argmax(&[0.1, 0.9]), 1);
    assert_eq!(argmax(&[0.9, 0.1]), 0);
    assert_eq!(argmax(&[0.5, 0.5]), 0);
    assert_eq!(argmax(&[0.2, 0.2, 0.6]), 2);
}

#[test]
fn missing_head_weights_fail_to_load() {
    let dev = Device::Cpu;
    let vb = VarBuilder::from_tensors(HashMap::new(), DType::F32, &dev);
    assert!(FusionHead::load(vb, TEST_HIDDEN).is_err());
}
