use csrmv::{
    dcsrmv, global_context, mv, CsrMatrix, IndexBase, MatDescr, Operation, RawCsr,
    SparseMatrix,
};

fn main() -> csrmv::Result<()> {
    println!("csrmv {}: sparse matrix-vector products", csrmv::VERSION);

    // 5 x 5 example matrix
    // [1 0 0 2 0]
    // [0 3 0 0 0]
    // [0 0 4 0 0]
    // [0 5 0 6 7]
    // [0 0 0 0 8]
    let row_ptr = [0, 2, 3, 4, 7, 8];
    let col_ind = [0, 3, 1, 2, 1, 3, 4, 4];
    let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
    let x = [1.0, 2.0, 3.0, 4.0, 5.0];

    let ctx = global_context();
    println!("\nExecution context: {:?}", ctx);

    // Raw triplet, validated on every call
    let raw = RawCsr::new(5, 5, &row_ptr, &col_ind, &values);
    let mut y = [0.0; 5];
    dcsrmv(
        Operation::None,
        1.0,
        &raw,
        &MatDescr::general(),
        Some(&x),
        0.0,
        Some(&mut y),
        ctx,
    )?;
    println!("\ny = A * x");
    println!("  {:?}", y);

    // Handle, optimized once and reused
    let mut a: SparseMatrix = CsrMatrix::new(IndexBase::Zero, raw).into();
    a.optimize()?;
    if let SparseMatrix::F64(matrix) = &a {
        println!("\n{:?}", matrix);
    }

    let mut y = [1.0; 5];
    mv(Operation::None, 2.0, &a, &MatDescr::general(), &x, 1.0, &mut y, ctx)?;
    println!("\ny = 2 * A * x + y");
    println!("  {:?}", y);

    Ok(())
}
