pub mod test_derivation;
