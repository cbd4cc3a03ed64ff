//! Streaming transcoding reader.

use std::io::{self, Read};

use encoding_rs::{Decoder, DecoderResult};

const INPUT_CHUNK: usize = 8 * 1024;

/// Wraps a byte reader and yields UTF-8, decoding on demand.
///
/// Only as much input is pulled from `inner` as the consumer asks for, so
/// reading the first CSV record never touches the rest of the file.
/// Malformed input surfaces as [`io::ErrorKind::InvalidData`].
pub struct DecodingReader<R> {
    inner: R,
    decoder: Decoder,
    input: Vec<u8>,
    input_start: usize,
    input_end: usize,
    output: Vec<u8>,
    output_pos: usize,
    eof: bool,
    finished: bool,
    malformed: bool,
}

impl<R: Read> DecodingReader<R> {
    pub fn new(inner: R, decoder: Decoder) -> Self {
        Self {
            inner,
            decoder,
            input: vec![0; INPUT_CHUNK],
            input_start: 0,
            input_end: 0,
            output: Vec::new(),
            output_pos: 0,
            eof: false,
            finished: false,
            malformed: false,
        }
    }

    fn fill_input(&mut self) -> io::Result<()> {
        loop {
            match self.inner.read(&mut self.input) {
                Ok(n) => {
                    self.input_start = 0;
                    self.input_end = n;
                    self.eof = n == 0;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn fill_output(&mut self) -> io::Result<()> {
        // Text decoded before the bad sequence has already been handed out.
        if self.malformed {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("malformed {} byte sequence", self.decoder.encoding().name()),
            ));
        }
        if self.input_start == self.input_end && !self.eof {
            self.fill_input()?;
        }

        let src = &self.input[self.input_start..self.input_end];
        let capacity = self
            .decoder
            .max_utf8_buffer_length_without_replacement(src.len())
            .unwrap_or(src.len() * 3 + 16);
        self.output.clear();
        self.output.resize(capacity, 0);
        self.output_pos = 0;

        let (result, read, written) =
            self.decoder
                .decode_to_utf8_without_replacement(src, &mut self.output, self.eof);
        self.input_start += read;
        self.output.truncate(written);

        match result {
            DecoderResult::InputEmpty => {
                if self.eof {
                    self.finished = true;
                }
                Ok(())
            }
            DecoderResult::OutputFull => Ok(()),
            DecoderResult::Malformed(_, _) => {
                self.malformed = true;
                Ok(())
            }
        }
    }
}

impl<R: Read> Read for DecodingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.output_pos < self.output.len() {
                let n = buf.len().min(self.output.len() - self.output_pos);
                buf[..n].copy_from_slice(&self.output[self.output_pos..self.output_pos + n]);
                self.output_pos += n;
                return Ok(n);
            }
            if self.finished {
                return Ok(0);
            }
            self.fill_output()?;
        }
    }
}
