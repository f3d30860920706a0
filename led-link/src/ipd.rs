//! `+IPD,<link>,<len>:<payload>` frames, the module's notice of inbound socket data.

pub const IPD_PREFIX: &[u8] = b"+IPD,";

/// A received line that carries socket data.
///
/// Only `payload` drives behaviour. The header numbers are kept for logging when they parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IpdFrame<'a> {
    pub link: Option<u8>,
    pub declared_len: Option<usize>,
    pub payload: &'a [u8],
}

impl<'a> IpdFrame<'a> {
    /// `None` unless the line starts with `+IPD,` and has a `:` after it.
    pub fn parse(line: &'a [u8]) -> Option<Self> {
        let rest = line.strip_prefix(IPD_PREFIX)?;
        let colon = rest.iter().position(|&b| b == b':')?;
        let (header, payload) = (&rest[..colon], &rest[colon + 1..]);

        let mut fields = header.split(|&b| b == b',');
        let link = fields
            .next()
            .and_then(parse_decimal)
            .and_then(|n| u8::try_from(n).ok());
        let declared_len = fields.next().and_then(parse_decimal);

        Some(Self {
            link,
            declared_len,
            payload,
        })
    }
}

fn parse_decimal(field: &[u8]) -> Option<usize> {
    if field.is_empty() {
        return None;
    }
    field.iter().try_fold(0usize, |acc, &b| {
        if !b.is_ascii_digit() {
            return None;
        }
        acc.checked_mul(10)?.checked_add(usize::from(b - b'0'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_header() {
        let frame = IpdFrame::parse(b"+IPD,0,8:led_5_on").unwrap();
        assert_eq!(frame.payload, b"led_5_on");
        assert_eq!(frame.link, Some(0));
        assert_eq!(frame.declared_len, Some(8));
    }

    #[test]
    fn payload_starts_after_first_colon() {
        let frame = IpdFrame::parse(b"+IPD,1,6:a:b:c").unwrap();
        assert_eq!(frame.payload, b"a:b:c");
    }

    #[test]
    fn header_numbers_are_not_validated() {
        let frame = IpdFrame::parse(b"+IPD,x,12:led_5_on").unwrap();
        assert_eq!(frame.link, None);
        assert_eq!(frame.declared_len, Some(12));
        assert_eq!(frame.payload, b"led_5_on");
    }

    #[test]
    fn empty_payload_is_a_frame() {
        let frame = IpdFrame::parse(b"+IPD,0,0:");
        assert_eq!(frame.map(|f| f.payload), Some(&b""[..]));
    }

    #[test]
    fn non_frames() {
        assert!(IpdFrame::parse(b"+IPD,0,8").is_none());
        assert!(IpdFrame::parse(b"0,CONNECT").is_none());
        assert!(IpdFrame::parse(b"OK").is_none());
        assert!(IpdFrame::parse(b" +IPD,0,1:x").is_none());
    }
}
