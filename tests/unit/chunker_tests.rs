/*!
 * Chunker property tests per the splitting contract
 */

use doctran::chunker::{normalize, smart_split};

/// Normalization applied twice equals normalization applied once
#[test]
fn test_normalize_idempotence_acrossMessyInputs() {
    let inputs = [
        "Title\n\n\n\nBody",
        "tabs\tand  spaces \n  mixed \r\n lines\r\r\n",
        "\x01\x02control\x1Fchars\x7F kept\nout",
        "   ",
        "already clean\n\nparagraphs",
    ];

    for input in inputs {
        let once = normalize(input);
        let twice = normalize(&once);
        assert_eq!(once, twice, "normalize not idempotent for {:?}", input);
    }
}

/// Chunking normalized input equals chunking doubly-normalized input
#[test]
fn test_smartSplit_afterNormalization_shouldBeStable() {
    let text = "First  paragraph.\r\n\r\n\r\nSecond\tparagraph. \n Third line.";
    let once = smart_split(&normalize(text), 40);
    let twice = smart_split(&normalize(&normalize(text)), 40);
    assert_eq!(once, twice);
}

/// Every non-hard-split chunk respects the bound; hard-split chunks are exact
#[test]
fn test_smartSplit_boundGuarantees() {
    // Paragraph-packed input: all chunks within bound
    let packed = vec!["p".repeat(25); 10].join("\n\n");
    for chunk in smart_split(&packed, 60) {
        assert!(chunk.chars().count() <= 60);
    }

    // Hard-split input: every slice exactly the bound except possibly the last
    let oversized = "q".repeat(145);
    let chunks = smart_split(&oversized, 60);
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].chars().count(), 60);
    assert_eq!(chunks[1].chars().count(), 60);
    assert_eq!(chunks[2].chars().count(), 25);
}

/// Joining chunks with the internal separator reconstructs the cleaned input
#[test]
fn test_smartSplit_roundTrip_forNonHardSplitInputs() {
    let texts = [
        "Alpha paragraph.\n\nBeta paragraph.\n\nGamma paragraph.",
        "One.\n\n\n\nTwo.\n\nThree.\n\nFour.\n\nFive.\n\nSix.",
        "Short single paragraph only.",
    ];

    for text in texts {
        let normalized = normalize(text);
        let chunks = smart_split(text, 30);
        let rejoined = chunks.join("\n\n");
        assert_eq!(
            normalize(&rejoined),
            normalized,
            "round trip failed for {:?}",
            text
        );
    }
}

/// The documented 30k single-paragraph case
#[test]
fn test_smartSplit_thirtyThousandChars_shouldHardSplitIntoThree() {
    let text = "x".repeat(30_000);
    let chunks = smart_split(&text, 12_000);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].len(), 12_000);
    assert_eq!(chunks[1].len(), 12_000);
    assert_eq!(chunks[2].len(), 6_000);
}

/// Chunks come out in the same order their paragraphs appeared
#[test]
fn test_smartSplit_shouldPreserveParagraphOrder() {
    let paragraphs: Vec<String> = (0..12).map(|i| format!("paragraph number {}", i)).collect();
    let text = paragraphs.join("\n\n");
    let chunks = smart_split(&text, 45);

    let rejoined = chunks.join("\n\n");
    let seen: Vec<&str> = rejoined.split("\n\n").collect();
    assert_eq!(
        seen,
        paragraphs.iter().map(String::as_str).collect::<Vec<_>>()
    );
}
