fn main() {
    let v = segment_compiler_core::vocabulary::Vocabulary::builtin();
    let c = segment_compiler_core::extract::extract_conditions(v, "users without a purchase who added items to cart");
    println!("{:#?}", c);
}
