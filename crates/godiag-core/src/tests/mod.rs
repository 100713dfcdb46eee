mod board;
mod fingerprint;
