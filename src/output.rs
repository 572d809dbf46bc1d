use bytes::{BufMut, BytesMut};

const COLOR_START: &str = "\x1b[01;31m";
const COLOR_RESET: &str = "\x1b[m";

pub fn put_match(buf: &mut BytesMut, s: &str, use_color: bool) {
    if use_color {
        buf.put_slice(COLOR_START.as_bytes());
        buf.put_slice(s.as_bytes());
        buf.put_slice(COLOR_RESET.as_bytes());
    } else {
        buf.put_slice(s.as_bytes());
    }
}
