use crate::error::AssembleError;

pub fn parse_hex(line: u32, text: &str) -> Result<u32, AssembleError> {
    u32::from_str_radix(text, 16).map_err(|_| AssembleError::MalformedDirective {
        line,
        detail: format!("'{}' is not a valid hex literal", text),
    })
}

pub fn parse_dec(line: u32, text: &str) -> Result<u32, AssembleError> {
    text.parse::<u32>()
        .map_err(|_| AssembleError::MalformedDirective {
            line,
            detail: format!("'{}' is not a valid decimal literal", text),
        })
}
