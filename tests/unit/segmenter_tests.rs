/*!
 * Segmenter property tests over varied markup shapes
 */

use doctran::segmenter::segment;

/// Sections reuse input spans; total content never exceeds the input length
#[test]
fn test_segment_contentConservation_acrossInputShapes() {
    let inputs = [
        "<h1>A</h1><p>body</p><h2>B</h2><p>body</p><h3>C</h3>",
        "<p>long preamble that is dropped</p><h1>Only</h1>rest of the text",
        "<h1></h1><h2>Titled</h2>tail",
        "plain text, no tags anywhere",
        "",
        "<h4>Deep</h4><ul><li>item</li></ul><h4>Deeper</h4>",
    ];

    for markup in inputs {
        let sections = segment(markup);
        let total: usize = sections.iter().map(|s| s.content.len()).sum();
        assert!(
            total <= markup.len(),
            "content total {} exceeds input length {} for {:?}",
            total,
            markup.len(),
            markup
        );
    }
}

/// Order values are always 0, 1, 2, ... with no gaps, whatever gets skipped
#[test]
fn test_segment_orderContiguity_acrossInputShapes() {
    let inputs = [
        "<h1>A</h1><h2>B</h2><h3>C</h3>",
        "<h1> </h1><h2>Kept</h2><h3></h3><h4>Also kept</h4>",
        "<p>pre</p><h2>X</h2>a<h2>Y</h2>b<h2>Z</h2>",
        "<h6>single</h6>",
    ];

    for markup in inputs {
        let sections = segment(markup);
        for (i, section) in sections.iter().enumerate() {
            assert_eq!(
                section.order, i,
                "non-contiguous order in {:?}: {:?}",
                markup, sections
            );
        }
    }
}

/// Levels always reflect the tag digit
#[test]
fn test_segment_levels_shouldMatchTagDigits() {
    let markup = "<h1>one</h1><h2>two</h2><h3>three</h3><h4>four</h4><h5>five</h5><h6>six</h6>";
    let sections = segment(markup);

    assert_eq!(sections.len(), 6);
    for (i, section) in sections.iter().enumerate() {
        assert_eq!(section.level as usize, i + 1);
    }
}

/// Nested heading levels keep document order, not a hierarchy
#[test]
fn test_segment_mixedLevels_shouldKeepDocumentOrder() {
    let markup = "<h2>First</h2>a<h1>Second</h1>b<h3>Third</h3>c";
    let sections = segment(markup);

    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
    let levels: Vec<u8> = sections.iter().map(|s| s.level).collect();
    assert_eq!(levels, vec![2, 1, 3]);
}
