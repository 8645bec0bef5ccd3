use ring_buffer::RingBuffer;
use ring_buffer_tests::{Sample, SampleHistory};
use serde_json::json;

fn history() -> SampleHistory {
    let mut samples = RingBuffer::with_capacity(4);
    for seq in 0..6u64 {
        samples.push_back(Sample {
            seq,
            label: format!("s{seq}"),
        });
        if samples.len() > 3 {
            samples.pop_front();
        }
    }
    SampleHistory {
        source: "sensor-a".to_string(),
        samples,
    }
}

#[test]
fn test_history_serializes_samples_in_logical_order() -> anyhow::Result<()> {
    let value = serde_json::to_value(history())?;
    assert_eq!(
        value,
        json!({
            "source": "sensor-a",
            "samples": [
                {"seq": 3, "label": "s3"},
                {"seq": 4, "label": "s4"},
                {"seq": 5, "label": "s5"}
            ]
        })
    );
    Ok(())
}

#[test]
fn test_history_round_trip() -> anyhow::Result<()> {
    let original = history();
    let encoded = serde_json::to_string(&original)?;
    let decoded: SampleHistory = serde_json::from_str(&encoded)?;
    assert_eq!(decoded, original);
    assert_eq!(decoded.samples.front().map(|s| s.seq), Some(3));
    Ok(())
}

#[test]
fn test_rejects_malformed_samples() {
    let result: Result<RingBuffer<Sample>, _> = serde_json::from_str(r#"[{"seq": "x"}]"#);
    assert!(result.is_err());
}
