use std::io::Read;
use twofold_core::Lexer;

fn main() {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input).unwrap();

    for token in Lexer::lex(&input).unwrap() {
        let text = token.span().slice(&input).unwrap_or("");
        eprintln!("TOKEN: {} {:?}", token, text);
    }
}
