//! Base58 密钥编解码
//!
//! 私钥导入使用 Solana 的 64 字节格式（32 字节种子 + 32 字节公钥），文本形式为 Base58。

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{AppError, AppResult};

pub const BASE58_ALPHABET: &[u8; 58] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// 私钥字节长度
pub const SECRET_KEY_LEN: usize = 64;

/// 64 字节私钥，离开作用域时自动清零
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; SECRET_KEY_LEN]);

impl SecretKey {
    pub fn from_bytes(bytes: &[u8]) -> AppResult<Self> {
        let array: [u8; SECRET_KEY_LEN] = bytes
            .try_into()
            .map_err(|_| AppError::invalid_key_length(bytes.len()))?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.0
    }
}

// 永不输出密钥内容
impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

fn alphabet_index(ch: char) -> Option<u32> {
    if !ch.is_ascii() {
        return None;
    }
    BASE58_ALPHABET
        .iter()
        .position(|&c| c == ch as u8)
        .map(|i| i as u32)
}

/// Base58 解码
///
/// 逐字符累加到小端字节缓冲：每一步乘 58 加上字符索引并逐字节进位，
/// 最后为每个前导 `'1'` 补一个零字节，再反转为大端序。
pub fn decode_base58(text: &str) -> AppResult<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::with_capacity(text.len());

    for ch in text.chars() {
        let mut carry = alphabet_index(ch).ok_or_else(|| AppError::invalid_character(ch))?;

        for byte in bytes.iter_mut() {
            carry += u32::from(*byte) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    // 前导零
    bytes.extend(text.chars().take_while(|&c| c == '1').map(|_| 0u8));

    bytes.reverse();
    Ok(bytes)
}

/// Base58 编码（地址展示用）
pub fn encode_base58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// 解析用户粘贴的私钥文本
pub fn decode_secret_key(text: &str) -> AppResult<SecretKey> {
    let mut decoded = decode_base58(text.trim())?;
    let key = SecretKey::from_bytes(&decoded);
    decoded.zeroize();
    key
}
