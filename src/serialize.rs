//! The fixed little-endian wire format (§6): every field element is 4
//! little-endian bytes of its canonical representative; `PublicKey` and
//! `Signature` are flat concatenations of such elements plus one trailing
//! tag byte for the public key's lifetime.

use crate::config::XmssParams;
use crate::error::WireError;
use crate::field::FieldElement;
use crate::signer::{PublicKey, Signature};

fn write_elements(out: &mut Vec<u8>, elements: &[FieldElement]) {
    for fe in elements {
        out.extend_from_slice(&fe.to_le_bytes());
    }
}

fn read_elements(bytes: &[u8], cursor: &mut usize, count: usize) -> Result<Vec<FieldElement>, WireError> {
    let needed = count * 4;
    if bytes.len() < *cursor + needed {
        return Err(WireError::Truncated {
            expected: *cursor + needed,
            actual: bytes.len(),
        });
    }
    let elements = bytes[*cursor..*cursor + needed]
        .chunks_exact(4)
        .map(|chunk| {
            let mut b = [0u8; 4];
            b.copy_from_slice(chunk);
            FieldElement::from_le_bytes(b)
        })
        .collect();
    *cursor += needed;
    Ok(elements)
}

impl PublicKey {
    /// `Parameter ‖ Root ‖ lifetime_log2`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.parameter.len() * 4 + self.root.len() * 4 + 1);
        write_elements(&mut out, &self.parameter);
        write_elements(&mut out, &self.root);
        out.push(self.lifetime_log2);
        out
    }

    pub fn from_bytes(bytes: &[u8], params: &XmssParams) -> Result<Self, WireError> {
        let mut cursor = 0;
        let parameter = read_elements(bytes, &mut cursor, params.parameter_len)?;
        let root = read_elements(bytes, &mut cursor, params.hash_output_len)?;
        if bytes.len() < cursor + 1 {
            return Err(WireError::Truncated {
                expected: cursor + 1,
                actual: bytes.len(),
            });
        }
        let lifetime_log2 = bytes[cursor];
        Ok(Self {
            parameter,
            root,
            lifetime_log2,
        })
    }
}

impl Signature {
    /// `randomness ‖ v chain values ‖ L authentication nodes`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let chain_len: usize = self.chain_values.iter().map(|v| v.len()).sum();
        let path_len: usize = self.auth_path.iter().map(|v| v.len()).sum();
        let mut out =
            Vec::with_capacity((self.randomness.len() + chain_len + path_len) * 4);
        write_elements(&mut out, &self.randomness);
        for chain_value in &self.chain_values {
            write_elements(&mut out, chain_value);
        }
        for node in &self.auth_path {
            write_elements(&mut out, node);
        }
        out
    }

    pub fn from_bytes(bytes: &[u8], params: &XmssParams) -> Result<Self, WireError> {
        let mut cursor = 0;
        let randomness = read_elements(bytes, &mut cursor, params.hash_output_len)?;

        let mut chain_values = Vec::with_capacity(params.num_chains());
        for _ in 0..params.num_chains() {
            chain_values.push(read_elements(bytes, &mut cursor, params.hash_output_len)?);
        }

        let mut auth_path = Vec::with_capacity(params.lifetime_log2 as usize);
        for _ in 0..params.lifetime_log2 {
            auth_path.push(read_elements(bytes, &mut cursor, params.hash_output_len)?);
        }

        Ok(Self {
            randomness,
            chain_values,
            auth_path,
        })
    }
}
