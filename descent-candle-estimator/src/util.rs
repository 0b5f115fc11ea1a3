//! Utilities.
use anyhow::{anyhow, Result};
use candle_nn::VarMap;

/// Overwrites every variable in `dest` with the value of the equally named
/// variable in `src`.
///
/// Variables are identified by their names. `Var::set` performs a deep copy
/// of the tensor data, so the two maps stay independent afterwards.
pub fn copy_vars(dest: &VarMap, src: &VarMap) -> Result<()> {
    let dest = dest.data().lock().unwrap();
    let src = src.data().lock().unwrap();

    for (name, v_dest) in dest.iter() {
        let v_src = src
            .get(name)
            .ok_or_else(|| anyhow!("variable {} is missing in the source map", name))?;
        v_dest.set(v_src.as_tensor())?;
    }

    Ok(())
}

#[test]
fn test_copy_vars() -> Result<()> {
    use candle_core::{DType, Device, Tensor};
    use candle_nn::Init;

    let t_src = Tensor::from_slice(&[1.0f32, 2.0, 3.0], (3,), &Device::Cpu)?;

    let init = Init::Randn {
        mean: 0.0,
        stdev: 1.0,
    };
    let vm_src = VarMap::new();
    vm_src.get((3,), "var1", init, DType::F32, &Device::Cpu)?;
    vm_src
        .data()
        .lock()
        .unwrap()
        .get("var1")
        .unwrap()
        .set(&t_src)?;

    let vm_dest = VarMap::new();
    vm_dest.get((3,), "var1", init, DType::F32, &Device::Cpu)?;

    copy_vars(&vm_dest, &vm_src)?;

    let t_dest = vm_dest
        .data()
        .lock()
        .unwrap()
        .get("var1")
        .unwrap()
        .as_tensor()
        .clone();
    assert!((t_src - t_dest)?.abs()?.sum(0)?.to_scalar::<f32>()? < 1e-32);

    Ok(())
}
