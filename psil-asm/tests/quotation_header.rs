use psil_asm::quotation::parse_header;
use psil_asm::HeaderFault;

#[test]
fn empty_header_zero() {
    let program = [0x00, 0x01, 0x02];
    let header = parse_header(&program).unwrap();
    assert!(header.spans.is_empty());
    assert_eq!(header.body_region_start, 1);
}

#[test]
fn empty_header_sentinel() {
    let program = [0xFF, 0x01];
    let header = parse_header(&program).unwrap();
    assert!(header.spans.is_empty());
    assert_eq!(header.body_region_start, 1);
}

#[test]
fn one_quotation_body() {
    // n=1, length=3 (little-endian), then 3 body bytes.
    let program = [0x01, 0x03, 0x00, 0x01, 0x08, 0xF0];
    let header = parse_header(&program).unwrap();
    assert_eq!(header.spans.len(), 1);
    assert_eq!(header.spans[0].offset, 0);
    assert_eq!(header.spans[0].length, 3);
    assert_eq!(header.body_region_start, 3);
}

#[test]
fn two_quotations_offsets_accumulate() {
    let program = [0x02, 0x02, 0x00, 0x03, 0x00, 0xAA, 0xBB, 0xCC, 0xCC, 0xCC];
    let header = parse_header(&program).unwrap();
    assert_eq!(header.spans[0], psil_asm::quotation::QuotationSpan { offset: 0, length: 2 });
    assert_eq!(header.spans[1], psil_asm::quotation::QuotationSpan { offset: 2, length: 3 });
}

#[test]
fn too_many_quotations_is_refused() {
    let mut program = vec![33u8];
    program.extend(std::iter::repeat(0u8).take(66));
    let err = parse_header(&program).unwrap_err();
    assert_eq!(err, HeaderFault::TooManyQuotations(33));
}

#[test]
fn truncated_lengths_is_refused() {
    let program = [0x02, 0x01, 0x00]; // n=2 but only one length's worth of bytes
    let err = parse_header(&program).unwrap_err();
    assert!(matches!(err, HeaderFault::TruncatedLengths { .. }));
}
